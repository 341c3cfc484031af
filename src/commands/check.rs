//! Check command implementation.
//!
//! Validates that every /proc source exists and parses with the configured layout.

use std::fmt::Display;

use sysload_reporter::Sampler;

use crate::config::{validate_effective_config, Config};
use crate::startup_checks::validate_sources;

/// Validates sources and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 sysload-reporter - Source Check");
    println!("==================================");

    let mut all_ok = true;
    let sampler_config = config.sampler_config();

    println!("\n📁 Checking sources under {}...", sampler_config.proc_root.display());
    match validate_sources(&sampler_config) {
        Ok(_) => println!("   ✅ All sources present"),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n📊 Parsing each source once...");
    let mut sampler = Sampler::new(sampler_config);

    all_ok &= report("cpu", sampler.cpu_utilization().map(|v| format!("{:.1}%", v)));
    all_ok &= report(
        "memory",
        sampler.memory_utilization().map(|v| format!("{:.1}%", v)),
    );
    all_ok &= report(
        "network",
        sampler.network_counters().map(|c| {
            format!(
                "{} rx={} tx={} packets",
                c.name, c.packets_received, c.packets_sent
            )
        }),
    );
    all_ok &= report(
        "disk",
        sampler.disk_counters().map(|c| {
            format!(
                "{} read={} written={} blocks",
                c.name, c.blocks_read, c.blocks_written
            )
        }),
    );

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - ready to sample");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review the output above");
        std::process::exit(1);
    }
}

fn report<E: Display>(name: &str, result: Result<String, E>) -> bool {
    match result {
        Ok(value) => {
            println!("   ✅ {:<8} {}", name, value);
            true
        }
        Err(e) => {
            println!("   ❌ {:<8} {}", name, e);
            false
        }
    }
}
