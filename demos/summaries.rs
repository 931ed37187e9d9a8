//! Example demonstrating summaries, the JSON catalog and call metrics.
//!
//! Several worker threads share one logger; afterwards the summary shows how
//! many lines each code emitted, independent of how many calls were made.

use logaroo::{args, Logger, MaxMessages, MessageDefinition, Severity};
use std::sync::Arc;
use std::thread;

fn main() {
    let logger = Logger::builder()
        .with_name("summaries")
        .with_level(Severity::Debug)
        .with_max_messages(MaxMessages::Limited(5))
        .with_timestamp(true)
        .build()
        .expect("stdout logger");

    logger
        .add_messages(vec![
            MessageDefinition::new(
                "JOB-001",
                Severity::Info,
                "job started",
                Some("worker {} started job {}"),
            )
            .expect("valid template"),
            MessageDefinition::new(
                "JOB-002",
                Severity::Error,
                "job failed",
                Some("job {job} failed: {reason}"),
            )
            .expect("valid template"),
            MessageDefinition::new("JOB-003", Severity::Debug, "job trace", Some("trace {}"))
                .expect("valid template")
                .with_verbosity(1),
            MessageDefinition::new("SYS-001", Severity::Critical, "system halted", None)
                .expect("valid template"),
        ])
        .expect("unique codes");

    println!("=== Summary Example ===\n");

    let logger = Arc::new(logger);
    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for job in 0..5 {
                    let _ = logger.log("JOB-001", args!(worker, job));
                    if job % 2 == 1 {
                        let _ = logger.log("JOB-002", args!(job = job, reason = "timeout"));
                    }
                    // Verbosity 1 is above the logger's verbosity 0
                    let _ = logger.log("JOB-003", args!(job));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker thread");
    }

    println!("\n{}\n", logger.get_summary());

    let metrics = logger.metrics().snapshot();
    println!("Calls:    {}", metrics.total_calls());
    println!("Emitted:  {}", metrics.messages_emitted);
    println!("Filtered: {}", metrics.messages_filtered);
    println!("Dropped:  {}", metrics.messages_dropped);
    println!("Drop rate: {:.1}%\n", metrics.drop_rate() * 100.0);

    println!("Catalog:");
    println!("{}", logger.catalog_json().expect("catalog serializes"));
}
