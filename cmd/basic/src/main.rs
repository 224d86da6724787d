//! Basic baserror example
//!
//! Builds a wrapped, chained, stack-captured error and prints every
//! rendering of it.
//!
//! # Environment Variables
//!
//! - `RUST_LOG=baserror=trace` - Show option merges and boundary selection
//! - `BASERR_STACK_DEPTH=5` - Frames kept by `with_stack()`
//! - `BASERR_CAPTURE=0` - Disable stack capture

use std::fs;
use std::io;

use baserror::{
    args, is_system_error, with_chain, with_msg_args, with_stack, BaseError, BaseResult, Render,
    ResultExt,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_level(true))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;
    Ok(())
}

fn read_settings(path: &str) -> BaseResult<String> {
    fs::read_to_string(path).wrap_err([with_chain(["read_settings"]), with_stack()])
}

fn load_profile(user: &str) -> BaseResult<String> {
    let path = format!("/nonexistent/{user}/settings.toml");
    match read_settings(&path) {
        Ok(text) => Ok(text),
        Err(cause) => Err(BaseError::new_system_code(
            "CFG001",
            "cannot load profile for %q",
            [with_msg_args(args![user]), with_chain(["load_profile"]), with_stack()],
        )
        .with_cause(cause)),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    println!("=== baserror basic example ===\n");

    let business = BaseError::new_code("USR404", "user not found", []);
    println!("business : {business}");

    let err = match load_profile("ann") {
        Ok(_) => return Ok(()),
        Err(err) => err,
    };

    println!("plain    : {}", err.render(Render::Plain));
    println!("quoted   : {}", err.render(Render::Quoted));
    println!("chain    : {}", err.chain_joined());
    println!("system   : {}", is_system_error(&err));
    println!("\n--- verbose ---\n{}", err.render(Render::Verbose));

    tracing::info!(code = err.code(), "example finished");

    // Foreign errors stay foreign; the conversion to anyhow keeps the chain.
    let io = io::Error::new(io::ErrorKind::Other, "raw io");
    println!("\nio is base error: {}", baserror::is_base_error(&io));
    let report = anyhow::Error::new(err);
    println!("anyhow chain length: {}", report.chain().count());

    Ok(())
}
