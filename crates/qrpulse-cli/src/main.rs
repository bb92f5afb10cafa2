//! qrpulse CLI — build and read structured QR payloads.
//!
//! Commands:
//!   qrpulse intents                        List intents and their fields
//!   qrpulse encode <intent> [k=v ...]      Encode fields, record in history
//!   qrpulse classify <payload|->           Print the detected intent
//!   qrpulse parse <payload|-> [intent]     Print parsed fields as JSON
//!   qrpulse history [limit]                Recent codes
//!   qrpulse show <id>                      Re-open a history record
//!   qrpulse remove <id>                    Delete a history record
//!   qrpulse clear                          Delete all history

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use qrpulse_core::effects::FileHistory;
use qrpulse_core::{bag_from_pairs, classify, paths, Fields, Intent, Studio};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let history = Arc::new(FileHistory::open(paths::history_path()));
    let studio = Studio::headless(history);

    let result = match args[0].as_str() {
        "intents" => cmd_intents(),
        "encode" => cmd_encode(&studio, &args[1..]),
        "classify" => cmd_classify(&args[1..]),
        "parse" => cmd_parse(&args[1..]),
        "history" => cmd_history(&studio, &args[1..]),
        "show" => cmd_show(&studio, &args[1..]),
        "remove" => cmd_remove(&studio, &args[1..]),
        "clear" => studio.clear_history().map_err(|e| e.to_string()),
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        other => Err(format!("unknown command: {}", other)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{}", msg);
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_intents() -> Result<(), String> {
    for intent in Intent::ALL {
        println!("{:<10} {}", intent, intent.field_names().join(", "));
    }
    Ok(())
}

fn cmd_encode(studio: &Studio, args: &[String]) -> Result<(), String> {
    let Some(tag) = args.first() else {
        return Err("usage: qrpulse encode <intent> [key=value ...] [--no-history]".into());
    };
    let intent: Intent = tag.parse().map_err(|e| format!("{}", e))?;
    let (flags, pairs): (Vec<&String>, Vec<&String>) =
        args[1..].iter().partition(|a| a.starts_with("--"));
    let skip_history = flags.iter().any(|f| f.as_str() == "--no-history");
    let fields = Fields::from_bag(intent, &bag_from_pairs(&pairs));

    if skip_history {
        println!("{}", qrpulse_core::encode(&fields));
        return Ok(());
    }
    let record = studio.generate(&fields).map_err(|e| e.to_string())?;
    println!("{}", record.content);
    log::info!("recorded {}", record.id);
    Ok(())
}

fn cmd_classify(args: &[String]) -> Result<(), String> {
    let payload = payload_arg(args, "usage: qrpulse classify <payload|->")?;
    println!("{}", classify(&payload));
    Ok(())
}

fn cmd_parse(args: &[String]) -> Result<(), String> {
    let payload = payload_arg(args, "usage: qrpulse parse <payload|-> [intent]")?;
    let intent = match args.get(1) {
        Some(tag) => tag.parse().map_err(|e| format!("{}", e))?,
        None => classify(&payload),
    };
    let bag = qrpulse_core::parse(&payload, intent).to_bag();
    let out = serde_json::json!({ "type": intent, "fields": bag });
    println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
    Ok(())
}

fn cmd_history(studio: &Studio, args: &[String]) -> Result<(), String> {
    let limit = args.first().and_then(|s| s.parse().ok()).unwrap_or(10);
    let records = studio.history();
    if records.is_empty() {
        println!("no history");
        return Ok(());
    }
    for record in records.iter().take(limit) {
        println!(
            "{}  {:<9} {}",
            record.id,
            record.intent,
            first_line(&record.content),
        );
    }
    Ok(())
}

fn cmd_show(studio: &Studio, args: &[String]) -> Result<(), String> {
    let Some(id) = args.first() else {
        return Err("usage: qrpulse show <id>".into());
    };
    let selection = studio.select(id).map_err(|e| e.to_string())?;
    let out = serde_json::json!({
        "id": selection.record.id,
        "type": selection.record.intent,
        "content": selection.record.content,
        "fields": selection.fields.to_bag(),
        "options": selection.record.options,
        "timestamp": selection.record.timestamp,
    });
    println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
    Ok(())
}

fn cmd_remove(studio: &Studio, args: &[String]) -> Result<(), String> {
    let Some(id) = args.first() else {
        return Err("usage: qrpulse remove <id>".into());
    };
    studio.remove(id).map_err(|e| e.to_string())?;
    println!("removed {}", id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// First argument as the payload; `-` reads it from stdin.
fn payload_arg(args: &[String], usage: &str) -> Result<String, String> {
    match args.first().map(String::as_str) {
        None => Err(usage.to_string()),
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("stdin: {}", e))?;
            Ok(buf.trim_end_matches(['\r', '\n']).to_string())
        }
        Some(payload) => Ok(payload.to_string()),
    }
}

fn first_line(content: &str) -> String {
    let line = content.lines().next().unwrap_or("");
    if content.contains('\n') {
        format!("{} …", line)
    } else {
        line.to_string()
    }
}

fn print_usage() {
    println!("qrpulse - structured QR payloads");
    println!();
    println!("usage: qrpulse <command> [args]");
    println!();
    println!("commands:");
    println!("  intents                      List intents and their fields");
    println!("  encode <intent> [k=v ...]    Encode fields (add --no-history to skip recording)");
    println!("  classify <payload|->         Print the detected intent");
    println!("  parse <payload|-> [intent]   Print parsed fields as JSON");
    println!("  history [limit]              Recent codes");
    println!("  show <id>                    Re-open a history record");
    println!("  remove <id>                  Delete a history record");
    println!("  clear                        Delete all history");
    println!();
    println!("history lives in ${} (default ~/{})", paths::ROOT_ENV, paths::DEFAULT_DIR);
}
