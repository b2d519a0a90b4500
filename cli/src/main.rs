use std::io;
use std::io::BufRead;
use std::process;

use anyhow::Context;
use clap::{crate_version, Arg, ArgAction, Command};
use wildcard_vm::{CompiledPattern, WildcardOptions};

const APP_HELP_TEMPLATE: &str = r#"wvm {version}, wildcard matching for strings.

{before-help}{usage-heading}
  {usage}

{all-args}{after-help}
"#;

const EXIT_NO_MATCH: i32 = 1;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::init();

    let args = cli().get_matches();

    let pattern = args.get_one::<String>("PATTERN").unwrap();
    let quiet = args.get_flag("quiet");
    let count = args.get_flag("count");
    let options = if args.get_flag("case-sensitive") {
        WildcardOptions::ordinal()
    } else {
        WildcardOptions::default()
    };

    let compiled = CompiledPattern::compile(pattern)
        .with_context(|| format!("can not compile `{}`", pattern))?;

    let mut matching = 0_usize;
    let mut test = |input: &str| -> anyhow::Result<()> {
        if compiled.is_match_with(input, options)? {
            matching += 1;
            if !quiet && !count {
                println!("{}", input);
            }
        }
        Ok(())
    };

    match args.get_many::<String>("STRING") {
        Some(inputs) => {
            for input in inputs {
                test(input)?;
            }
        }
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("can not read from stdin")?;
                test(&line)?;
            }
        }
    }

    if count && !quiet {
        println!("{}", matching);
    }

    // Like grep, report "nothing matched" through the exit status.
    if matching == 0 {
        process::exit(EXIT_NO_MATCH);
    }

    Ok(())
}

fn cli() -> Command {
    Command::new("wvm")
        .version(crate_version!())
        .about("Tests strings against a wildcard pattern")
        .help_template(APP_HELP_TEMPLATE)
        .arg(
            Arg::new("PATTERN")
                .required(true)
                .help("Wildcard pattern (`*`, `?`, `[abc]`, backtick escapes)"),
        )
        .arg(
            Arg::new("STRING")
                .num_args(0..)
                .help("Strings to test; lines are read from stdin when omitted"),
        )
        .arg(
            Arg::new("case-sensitive")
                .short('s')
                .long("case-sensitive")
                .action(ArgAction::SetTrue)
                .help("Match case-sensitively"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Print nothing; the exit status tells whether anything matched"),
        )
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .action(ArgAction::SetTrue)
                .help("Print the number of matching strings instead of the strings"),
        )
}
