//! Store connectivity check
//!
//! Pings both stores with the configured timeout and prints one line each.
//! Fails only when the primary is unreachable, since the bridge can serve
//! without the secondary.

use std::fmt::Display;

use anyhow::{bail, Context, Result};
use clap::Parser;

use contactsync_server::{build_service, BridgeConfig, StoreKind};

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {}

/// Run the connectivity check
pub async fn run_check(_args: CheckArgs) -> Result<()> {
    let bridge = BridgeConfig::from_env().context("Invalid bridge configuration")?;
    let service = build_service(&bridge);

    let mut primary_ok = false;
    for (store, result) in service.ping().await {
        if store == StoreKind::Primary && result.is_ok() {
            primary_ok = true;
        }
        println!("{}", status_line(store, &result));
    }

    if !primary_ok {
        bail!("primary store is not reachable");
    }
    Ok(())
}

/// `primary: ok` or `secondary: unreachable (<reason>)`
fn status_line<E: Display>(store: StoreKind, result: &Result<(), E>) -> String {
    match result {
        Ok(()) => format!("{store}: ok"),
        Err(e) => format!("{store}: unreachable ({e})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_store_line() {
        let result: Result<(), String> = Ok(());
        assert_eq!(status_line(StoreKind::Primary, &result), "primary: ok");
    }

    #[test]
    fn unreachable_store_line_includes_reason() {
        let result: Result<(), String> = Err("store call timed out after 5s".into());
        assert_eq!(
            status_line(StoreKind::Secondary, &result),
            "secondary: unreachable (store call timed out after 5s)"
        );
    }
}
