use anyhow::{bail, Context, Result};
use glkfref::logging::StderrLogger;
use glkfref::prompt::TerminalInput;
use glkfref::session::parse_switch;
use glkfref::{FileMode, FileUsage, FilerefRegistry, PromptOutcome, Session, SessionConfig};
use log::LevelFilter;
use std::path::PathBuf;

const USAGE: &str = "usage: glkfref [--defprompt yes|no] [--debug-log PATH] [--load|--store] \
[--usage save|data|transcript|command] [BASEFILE]";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let mut logger = StderrLogger::new(LevelFilter::Warn);
    if let Some(path) = &options.debug_log {
        logger = logger.with_level(LevelFilter::Debug).with_file_output(path);
    }
    logger.install().context("failed to install logger")?;

    let mut config = SessionConfig::from_env();
    if let Some(enabled) = options.prompt_defaults {
        config.prompt_defaults = enabled;
    }
    let mut session = Session::with_config(config);
    if let Some(base_file) = &options.base_file {
        session.set_base_file(base_file);
    }

    let mut registry = FilerefRegistry::new();
    let mut input = TerminalInput::stdout();
    let outcome = registry
        .create_by_prompt(&mut session, &mut input, options.usage, options.mode, 0)
        .context("file prompt failed")?;

    match outcome {
        PromptOutcome::Created(fref) => {
            let exists = registry.does_file_exist(fref);
            let entry = registry.get(fref).context("created fileref vanished")?;
            println!("{} ({})", entry.path(), if exists { "exists" } else { "new" });
        }
        PromptOutcome::Cancelled => println!("cancelled"),
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
struct Options {
    base_file: Option<String>,
    prompt_defaults: Option<bool>,
    debug_log: Option<PathBuf>,
    usage: FileUsage,
    mode: FileMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_file: None,
            prompt_defaults: None,
            debug_log: None,
            usage: FileUsage::SAVED_GAME,
            mode: FileMode::Write,
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--defprompt" => {
                let value = iter.next().context("--defprompt needs yes or no")?;
                let enabled = parse_switch(value)
                    .with_context(|| format!("--defprompt: unexpected value {:?}", value))?;
                options.prompt_defaults = Some(enabled);
            }
            "--debug-log" => {
                let path = iter.next().context("--debug-log needs a path")?;
                options.debug_log = Some(PathBuf::from(path));
            }
            "--load" => options.mode = FileMode::Read,
            "--store" => options.mode = FileMode::Write,
            "--usage" => {
                let value = iter.next().context("--usage needs a value")?;
                options.usage = match value.as_str() {
                    "save" => FileUsage::SAVED_GAME,
                    "data" => FileUsage::DATA,
                    "transcript" => FileUsage::TRANSCRIPT.text(),
                    "command" => FileUsage::INPUT_RECORD.text(),
                    other => bail!("--usage: unknown usage {:?}\n{}", other, USAGE),
                };
            }
            "-h" | "--help" => bail!("{}", USAGE),
            other if other.starts_with('-') => bail!("unknown option {}\n{}", other, USAGE),
            other => options.base_file = Some(other.to_string()),
        }
    }

    Ok(options)
}
