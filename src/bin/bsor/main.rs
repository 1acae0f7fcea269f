//! bsor CLI - Tool for inspecting replay files.

use bsor::prelude::*;
use rayon::prelude::*;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_DATE: &str = env!("BSOR_BUILD_DATE");
const BUILD_TIME: &str = env!("BSOR_BUILD_TIME");

/// Install the stderr subscriber. `RUST_LOG` wins over the flag level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "warn";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            "-V" | "--version" => {
                println!("bsor-cli {} (built {} {})", VERSION, BUILD_DATE, BUILD_TIME);
                return;
            }
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let files = &filtered_args[1..];
    match filtered_args[0] {
        // Info command - replay metadata
        "info" | "i" => {
            if files.is_empty() {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: bsor-cli info <file.bsor>");
                std::process::exit(1);
            }
            cmd_info(files[0]);
        }

        // Stats command - per-file summary, decoded in parallel
        "stats" | "s" => {
            if files.is_empty() {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: bsor-cli stats <file.bsor>...");
                std::process::exit(1);
            }
            cmd_stats(files);
        }

        // Dump command - full session as JSON
        "dump" | "d" => {
            if files.is_empty() {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: bsor-cli dump <file.bsor>");
                std::process::exit(1);
            }
            cmd_dump(files[0]);
        }

        // Verify command - buffer vs streaming parity
        "verify" | "v" => {
            if files.is_empty() {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: bsor-cli verify <file.bsor>...");
                std::process::exit(1);
            }
            cmd_verify(files);
        }

        // Help
        "help" | "h" | "-h" | "--help" => print_help(),

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_info(filtered_args[0]);
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    }
}

fn print_help() {
    println!("bsor-cli - VR replay (.bsor) inspector");
    println!();
    println!("USAGE:");
    println!("    bsor-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file>          Show player, map and run metadata");
    println!("    s, stats  <file>...       Show event counts and timing per file");
    println!("    d, dump   <file>          Print the decoded replay as JSON");
    println!("    v, verify <file>...       Decode with both decoders and compare");
    println!("    h, help                   Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Errors only");
    println!("    -V, --version    Show version and build date");
    println!();
    println!("NOTES:");
    println!("    - Passing a .bsor file directly is equivalent to 'info'");
    println!("    - RUST_LOG overrides the verbosity flags");
    println!("    - dump requires --features serde");
}

fn open_or_exit(path: &str) -> ReplaySession {
    match BufferReplayDecoder::new().open(path) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to read replay {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn cmd_info(path: &str) {
    tracing::info!("Opening replay: {}", path);
    let session = open_or_exit(path);
    let info = &session.info;

    println!("Replay: {}", path);
    println!("Recorder: {} (game {})", info.version, info.game_version);
    println!("Timestamp: {}", info.timestamp);
    println!();
    println!("Player:");
    println!("  Name:     {} ({})", info.player_name, info.player_id);
    println!("  Platform: {}", info.platform);
    println!("  Tracking: {} / {} / {}", info.tracking_system, info.hmd, info.controller);
    println!("  Height:   {:.2}m{}", info.height, if info.left_handed { " (left-handed)" } else { "" });
    println!();
    println!("Map:");
    println!("  Song:       {}", info.song_name);
    println!("  Mapper:     {}", info.mapper);
    println!("  Difficulty: {} ({})", info.difficulty, info.mode);
    println!("  Hash:       {}", info.hash);
    println!("  Environment: {}", info.environment);
    println!();
    println!("Run:");
    println!("  Score:     {}", info.score);
    let modifiers = info.modifier_list();
    if !modifiers.is_empty() {
        println!("  Modifiers: {}", modifiers.join(", "));
    }
    println!("  Speed:     {}", info.speed);
    println!("  JD:        {:.2}", info.jump_distance);
    println!("  Start:     {:.2}s", info.start_time);
    if info.failed() {
        println!("  Failed at: {:.2}s", info.fail_time);
    }
}

fn cmd_stats(paths: &[&str]) {
    let results: Vec<(&str, Result<ReplayStats>)> = paths
        .par_iter()
        .map(|&path| {
            let stats = BufferReplayDecoder::new().open(path).map(|s| s.stats());
            (path, stats)
        })
        .collect();

    let mut failed = 0usize;
    for (path, result) in results {
        match result {
            Ok(stats) => print_stats(path, &stats),
            Err(e) => {
                eprintln!("Failed to read replay {}: {}", path, e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_stats(path: &str, stats: &ReplayStats) {
    println!("Replay: {}", path);
    println!("  Duration: {:.2}s over {} frames ({:.1} fps avg)", stats.duration, stats.frames, stats.average_fps);
    println!("  Notes:    {} good, {} bad, {} missed", stats.good_cuts, stats.bad_cuts, stats.misses);
    println!("  Hazards:  {} bombs, {} walls", stats.bomb_hits, stats.wall_hits);
    if stats.pauses > 0 {
        println!("  Pauses:   {} ({}s total)", stats.pauses, stats.paused_seconds);
    }
    if stats.full_combo() {
        println!("  Full combo");
    }
    println!();
}

#[cfg(feature = "serde")]
fn cmd_dump(path: &str) {
    let session = open_or_exit(path);
    match serde_json::to_string_pretty(&session) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "serde"))]
fn cmd_dump(_path: &str) {
    eprintln!("JSON dump not available. Rebuild with: cargo build --features serde");
    std::process::exit(1);
}

/// Outcome of decoding one file with both decoders.
enum Verdict {
    Ok,
    Mismatch,
    Failed(String),
    Diverged(String),
}

fn verify_one(path: &str) -> Verdict {
    let buffered = BufferReplayDecoder::new().open(path);
    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(rt) => rt,
        Err(e) => return Verdict::Failed(format!("runtime: {}", e)),
    };
    let streamed = runtime.block_on(async {
        let file = tokio::fs::File::open(path).await?;
        StreamingReplayDecoder::new().decode(file).await
    });

    match (buffered, streamed) {
        (Ok(a), Ok(b)) if a == b => Verdict::Ok,
        (Ok(_), Ok(_)) => Verdict::Mismatch,
        (Err(a), Err(b)) => Verdict::Failed(format!("{} / {}", a, b)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Verdict::Diverged(e.to_string()),
    }
}

fn cmd_verify(paths: &[&str]) {
    let results: Vec<(&str, Verdict)> = paths
        .par_iter()
        .map(|&path| (path, verify_one(path)))
        .collect();

    let mut failed = 0usize;
    for (path, verdict) in results {
        if !matches!(verdict, Verdict::Ok) {
            failed += 1;
        }
        match verdict {
            Verdict::Ok => println!("OK       {}", path),
            Verdict::Mismatch => println!("MISMATCH {}", path),
            Verdict::Failed(msg) => println!("FAILED   {} ({})", path, msg),
            Verdict::Diverged(msg) => println!("DIVERGED {} ({})", path, msg),
        }
    }
    if failed > 0 {
        std::process::exit(1);
    }
}
