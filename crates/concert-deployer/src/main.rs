use clap::Parser;

#[tokio::main]
async fn main() {
    let args = concert_deployer::arguments::Arguments::parse();
    observe::tracing::initialize(&args.observe_config());
    tracing::info!("running concert deployer with validated arguments:\n{}", args);
    if let Err(err) = concert_deployer::run(args).await {
        tracing::error!(?err, "deployment failed");
        std::process::exit(1);
    }
}
