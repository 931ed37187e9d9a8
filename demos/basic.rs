//! Basic example demonstrating a message catalog with an emission ceiling.
//!
//! Registers a few codes, logs them with positional and named arguments, and
//! shows that each code stops after `max_messages` lines.

use logaroo::{args, Args, LogOutcome, Logger, MaxMessages, Severity};

fn main() {
    // Diagnostics of the logger itself (ceiling notices, sink failures)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let logger = Logger::builder()
        .with_name("basic")
        .with_max_messages(MaxMessages::Limited(3))
        .build()
        .expect("stdout logger");

    logger
        .add_message("ERR-001", Severity::Error, "basic error", None)
        .expect("register ERR-001");
    logger
        .add_message(
            "VAL-001",
            Severity::Warning,
            "Value comparison",
            Some("Value {value1} is larger than {value2}"),
        )
        .expect("register VAL-001");
    logger
        .add_message("DBG-001", Severity::Debug, "debug trace", Some("step {}"))
        .expect("register DBG-001");

    println!("=== Basic Catalog Example ===\n");

    logger.log("ERR-001", args!("Something went wrong")).unwrap();
    logger.log("ERR-001", Args::None).unwrap();
    logger.log("VAL-001", args!(value1 = 10, value2 = 9)).unwrap();

    println!("\nDEBUG codes are below the INFO threshold:");
    let outcome = logger.log("DBG-001", args!(1)).unwrap();
    println!("  DBG-001 -> {:?}", outcome);

    println!("\nEmitting VAL-001 ten times with a ceiling of 3:");
    for i in 1..=10 {
        let outcome = logger
            .log("VAL-001", args!(value1 = i + 1, value2 = i))
            .unwrap();
        if let LogOutcome::Dropped = outcome {
            println!("  call {} dropped", i);
        }
    }

    println!("\nUnknown codes are errors:");
    if let Err(err) = logger.log("TEST-999", Args::None) {
        println!("  {}", err);
    }

    println!("\n{}", logger.get_summary());
    logger.close();
}
