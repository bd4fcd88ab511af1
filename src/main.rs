//! dictconv - Format converter for CMU-style pronunciation dictionaries

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::bail;
use dictconv::process::{convert_file, ConvertStats};
use dictconv::{find_dialect, parse_args, CliArgs, Config, Dialect, Result};
use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = parse_args();

    // Check if we should read from stdin
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // If no inputs and running interactively, print usage; otherwise read from stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        // Process stdin - use current directory for config discovery
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    if args.output.is_some() && args.in_place {
        bail!("--output and --in-place are mutually exclusive");
    }

    // Collection config: discovered from the working directory, used for the
    // extension filter. For explicit config files this same config applies to
    // every file; for auto-discovery each file may have its own config.
    let collection_config = build_config(&args, None)?;
    let use_per_file_config = args.config.is_none();
    let base_config = if use_per_file_config {
        None
    } else {
        Some(collection_config.clone())
    };

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                eprintln!("Warning: failed to configure thread pool: {e}");
            }
        }
    }

    // Collect all files to process
    let files = collect_files(&args, &collection_config);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No dictionary files found to convert.");
        }
        return Ok(());
    }

    if args.output.is_some() && files.len() > 1 {
        bail!("--output requires a single input file");
    }

    // Process files; stdout output must stay in input order, so only
    // in-place conversion runs in parallel
    let use_sequential = !args.in_place || args.jobs == Some(1);
    if use_sequential {
        process_files_sequential(&files, base_config.as_ref(), &args);
    } else {
        process_files_parallel(&files, base_config.as_ref(), &args);
    }

    Ok(())
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        // Explicit config file specified
        if args.debug {
            eprintln!(
                "[DEBUG] Using explicit config file: {}",
                config_path.display()
            );
        }
        Config::from_toml_file(config_path)?
    } else if let Some(path) = for_path {
        // Auto-discover config files from parent directories
        if args.debug {
            let discovered = Config::discover_config_files(path);
            if discovered.is_empty() {
                eprintln!("[DEBUG] No config files discovered for: {}", path.display());
            } else {
                eprintln!("[DEBUG] Discovered config files for {}:", path.display());
                for f in &discovered {
                    eprintln!("[DEBUG]   - {}", f.display());
                }
            }
        }
        Config::from_discovered_files(path)
    } else {
        // No path provided, use current directory for discovery
        Config::from_discovered_files(&std::env::current_dir().unwrap_or_default())
    };

    // Override with CLI arguments
    if let Some(to) = &args.to {
        config.format.clone_from(to);
    }
    for extension in &args.extensions {
        if !config.extensions.contains(extension) {
            config.extensions.push(extension.clone());
        }
    }

    if args.debug {
        eprintln!("[DEBUG] Configuration:");
        eprintln!("[DEBUG]   format: {}", config.format);
        eprintln!("[DEBUG]   extensions: {:?}", config.extensions);
    }

    // Validate configuration
    if let Some(error) = config.validate() {
        bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Look up the target dialect named by a validated configuration
fn resolve_dialect(config: &Config) -> Result<&'static Dialect> {
    match find_dialect(&config.format) {
        Some(dialect) => Ok(dialect),
        None => bail!("unknown dictionary format '{}'", config.format),
    }
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs, config: &Config) -> Vec<PathBuf> {
    // Compile exclude patterns
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // Recursive directory traversal
                // Note: WalkDir detects symlink loops when follow_links(true) and
                // returns errors for them. We skip errors via filter_map(ok).
                // max_depth prevents runaway traversal in pathological directory structures.
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_dictionary_file(path, &config.extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else {
                // Non-recursive: only direct children
                if let Ok(entries) = std::fs::read_dir(input) {
                    for entry in entries.filter_map(std::result::Result::ok) {
                        let path = entry.path();
                        if path.is_file()
                            && is_dictionary_file(&path, &config.extensions)
                            && !is_excluded(&path, &exclude_patterns)
                        {
                            files.push(path);
                        }
                    }
                }
            }
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        // Match against full path
        if pattern.matches(&path_str) {
            return true;
        }

        // Match against file name only
        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Match against each path component (for directory patterns)
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a recognized dictionary extension
fn is_dictionary_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions.iter().any(|known| {
                let known = known.strip_prefix('.').unwrap_or(known);
                ext == known
            })
        })
}

/// Process files sequentially (for stdout output)
fn process_files_sequential(files: &[PathBuf], base_config: Option<&Config>, args: &CliArgs) {
    for path in files {
        // Use base config if provided, otherwise discover per-file config
        let file_result = if let Some(config) = base_config {
            process_single_file(path, config, args)
        } else {
            match build_config(args, Some(path)) {
                Ok(config) => process_single_file(path, &config, args),
                Err(e) => Err(e),
            }
        };

        if let Err(e) = file_result {
            eprintln!("Error converting {}: {}", path.display(), e);
        }
    }
}

/// Process files in parallel using Rayon (in-place conversion only)
fn process_files_parallel(files: &[PathBuf], base_config: Option<&Config>, args: &CliArgs) {
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);
    let malformed_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        // Use base config if provided, otherwise discover per-file config
        let file_result = if let Some(config) = base_config {
            process_single_file(path, config, args)
        } else {
            match build_config(args, Some(path)) {
                Ok(config) => process_single_file(path, &config, args),
                Err(e) => Err(e),
            }
        };

        match file_result {
            Ok(stats) => {
                success_count.fetch_add(1, Ordering::Relaxed);
                malformed_count.fetch_add(stats.errors, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                eprintln!("Error converting {}: {}", path.display(), e);
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);
    let malformed = malformed_count.load(Ordering::Relaxed);

    if !args.silent {
        if errors == 0 {
            eprintln!("Converted {success} files successfully.");
        } else {
            eprintln!("Converted {success} files, {errors} errors.");
        }
        if malformed > 0 {
            eprintln!("{malformed} malformed lines reported.");
        }
    }
}

/// Process a single file
fn process_single_file(path: &PathBuf, config: &Config, args: &CliArgs) -> Result<ConvertStats> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata = std::fs::metadata(path)?;
    let file_size = metadata.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            let size_mb = file_size / (1024 * 1024);
            let limit_mb = DEFAULT_MAX_FILE_SIZE / (1024 * 1024);
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                size_mb,
                limit_mb
            );
        }
        return Ok(ConvertStats::default());
    }

    let dialect = resolve_dialect(config)?;

    // Read input file into memory
    let mut file_contents = Vec::new();
    File::open(path)?.read_to_end(&mut file_contents)?;

    if !args.silent && args.in_place {
        eprintln!("Converting: {}", path.display());
    }

    // Convert the file; diagnostics are buffered so parallel runs don't
    // interleave them mid-line
    let reader = BufReader::new(Cursor::new(&file_contents));
    let mut output = Vec::new();
    let mut diagnostics = Vec::new();
    let stats = convert_file(reader, &mut output, &mut diagnostics, dialect)?;

    if !diagnostics.is_empty() {
        io::stderr().lock().write_all(&diagnostics)?;
    }

    if args.debug {
        eprintln!(
            "[DEBUG] {}: {} lines ({} entries, {} comments, {} blanks, {} errors)",
            path.display(),
            stats.lines,
            stats.entries,
            stats.comments,
            stats.blanks,
            stats.errors
        );
    }

    // Output results
    if args.in_place {
        std::fs::write(path, &output)?;
    } else if let Some(output_path) = &args.output {
        std::fs::write(output_path, &output)?;
    } else {
        io::stdout().write_all(&output)?;
    }

    Ok(stats)
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<()> {
    // Read all input from stdin
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    // Check size after reading to prevent processing extremely large input
    #[allow(clippy::cast_possible_truncation)]
    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let dialect = resolve_dialect(config)?;

    // Convert the input
    let reader = BufReader::new(Cursor::new(&stdin_contents));
    let mut output = Vec::new();
    let mut diagnostics = Vec::new();
    let stats = convert_file(reader, &mut output, &mut diagnostics, dialect)?;

    if !diagnostics.is_empty() {
        io::stderr().lock().write_all(&diagnostics)?;
    }

    if args.debug {
        eprintln!(
            "[DEBUG] stdin: {} lines ({} entries, {} comments, {} blanks, {} errors)",
            stats.lines, stats.entries, stats.comments, stats.blanks, stats.errors
        );
    }

    // Write converted output, either to --output or to stdout
    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &output)?;
    } else {
        io::stdout().write_all(&output)?;
    }

    if !args.silent && stats.errors > 0 {
        eprintln!("{} malformed lines reported.", stats.errors);
    }

    Ok(())
}

fn print_usage() {
    println!(
        "dictconv v{} - pronunciation dictionary format converter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Converts CMU-style pronunciation dictionaries between dialects.");
    println!();
    println!("Usage:");
    println!("  dictconv [OPTIONS] <FILE>...");
    println!("  dictconv [OPTIONS] -r <DIRECTORY>");
    println!("  dictconv [OPTIONS] -              # Read from stdin");
    println!("  cat words.dict | dictconv         # Pipe input");
    println!();
    println!("Examples:");
    println!("  dictconv words.dict                   # Convert to stdout (cmudict)");
    println!("  dictconv -t cmudict-new words.dict    # Convert to the new-style dialect");
    println!("  dictconv -o out.dict words.dict       # Write to a file");
    println!("  dictconv -i -t cmudict -r dicts/      # Normalize a directory in-place");
    println!("  dictconv - < words.dict               # Read from stdin, write to stdout");
    println!();
    println!("Options:");
    println!("  -t, --to <DIALECT>        Target dialect [default: cmudict]");
    println!("                              cmudict-wade  classic, ## comments");
    println!("                              cmudict       classic, ;;; comments");
    println!("                              cmudict-new   lowercase words, # inline comments");
    println!("  -o, --output <FILE>       Write output to FILE (single input only)");
    println!("  -i, --in-place            Rewrite input files with converted output");
    println!("  -r, --recursive           Process directories recursively");
    println!("  -e, --exclude <PATTERN>   Exclude files/dirs matching pattern (repeatable)");
    println!("  -x, --extension <EXT>     Additional dictionary extension (repeatable)");
    println!("  -j, --jobs <NUM>          Parallel jobs for in-place runs (0=auto, 1=sequential)");
    println!("  -c, --config <FILE>       Config file path (overrides auto-discovery)");
    println!("  -S, --silent              Silent mode");
    println!("  -D, --debug               Enable debug output");
    println!("  -h, --help                Print help");
    println!();
    println!("Malformed lines are reported on stderr and skipped in the output;");
    println!("entries missing the two-space separator are reported and kept.");
    println!();
    println!("Supported extensions: .dict, .dic (add more with -x)");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for dictconv.toml in parent directories");
    println!("  starting from the file being converted up to the root directory.");
    println!("  Also checks dictconv.toml in the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
}
