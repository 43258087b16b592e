//! Weather agent demo: describe two native functions, advertise them to a
//! model, and run the calls it asks for.
//!
//! Runs offline against a scripted model. Pass `--show-request` to print the
//! chat-completions body an OpenAI-compatible endpoint would receive.

mod functions;
mod scripted;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fnwrap::adapters::dispatch::ToolDispatcher;
use fnwrap::adapters::openai::OpenAiCodec;
use fnwrap::adapters::traits::{ChatMessage, CompletionRequest, CompletionService};
use fnwrap::config::CompletionConfig;
use fnwrap::{FunctionRegistry, ToolDescriptor, ToolManifest, serialize_tools};
use tracing::{info, warn};

use crate::scripted::ScriptedModel;

const TIME_MANIFEST: &str = include_str!("../tools/get_current_time.json");

#[derive(Debug, Parser)]
#[command(about = "Dispatch model-requested weather and time lookups")]
struct Args {
    /// User prompt sent to the model.
    #[arg(
        long,
        default_value = "What's the weather and current time like in San Francisco, Tokyo, and Paris?"
    )]
    prompt: String,

    /// Model name; overrides FNWRAP_MODEL.
    #[arg(long)]
    model: Option<String>,

    /// Log filter; overrides FNWRAP_LOG and RUST_LOG.
    #[arg(long)]
    log: Option<String>,

    /// Print the encoded chat-completions request body.
    #[arg(long)]
    show_request: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    fnwrap::telemetry::init(args.log.as_deref());

    let mut config = CompletionConfig::from_env().context("loading completion config")?;
    if let Some(model) = args.model {
        config = config.with_model(model);
    }

    let registry = FunctionRegistry::new();
    let tools = describe_tools(&registry)?;
    let names = registry.names()?;
    info!(tools = tools.len(), functions = ?names, "tools registered");

    let mut messages = vec![
        ChatMessage::system("Answer weather and time questions using the provided tools."),
        ChatMessage::user(args.prompt),
    ];
    let request = CompletionRequest::new(messages.clone())?
        .with_tools(serialize_tools(&tools))
        .with_tool_choice(config.tool_choice());

    if args.show_request {
        let codec = OpenAiCodec::new(&config);
        let body = codec.encode(&request)?;
        println!("POST {}", codec.endpoint());
        match codec.authorization() {
            Ok(_) => println!("Authorization: Bearer <redacted>"),
            Err(err) => warn!(error = %err, "a live endpoint would reject this request"),
        }
        println!("{}", String::from_utf8_lossy(&body));
    }

    let model = ScriptedModel::new(config.model());
    let dispatcher = ToolDispatcher::new(Arc::new(registry));

    let response = model.complete(request).await?;
    let calls = response.tool_calls().to_vec();
    info!(
        provider = model.metadata().provider(),
        model = %model.metadata().model(),
        calls = calls.len(),
        "model replied"
    );

    if !calls.is_empty() {
        let results = dispatcher.dispatch_all(&calls)?;
        messages.push(response.into_message());
        messages.extend(results);
        let followup = model.complete(CompletionRequest::new(messages)?).await?;
        println!("{}", followup.message().content());
    } else {
        println!("{}", response.message().content());
    }

    Ok(())
}

fn describe_tools(registry: &FunctionRegistry) -> Result<Vec<ToolDescriptor>> {
    let weather = ToolDescriptor::builder("Get the current weather in a given location.")
        .function(functions::get_current_weather())
        .required(["location"])
        .param::<String>("location", "The city and state, e.g. San Francisco, CA")
        .enum_param(
            "unit",
            ["celsius", "fahrenheit"],
            "The unit of temperature, e.g. celsius or fahrenheit",
        )
        .build(registry)
        .context("describing get_current_weather")?;

    let time = ToolManifest::from_json(TIME_MANIFEST)?
        .build(&[functions::get_current_time()], registry)
        .context("describing get_current_time")?;

    Ok(vec![weather, time])
}
