//! Command-line chain parsing and the command chain runner.
//!
//! A command line is any mix of `parameter=value` pairs and command tokens:
//!
//! ```text
//! socbuild container_name=me/tinysoc:dev compile build program
//! ```
//!
//! Commands run in the order given, each under a `[i/n] <command>: ` prefix.
//! The first failing command ends the run.

use crate::commands::CommandKind;
use crate::errors::UsageError;
use crate::session::Session;
use anyhow::Result;
use clap::ValueEnum;

/// Parameters accepted as `key=value` arguments.
pub const PARAMETERS: &[(&str, &str)] = &[
    (
        "container_name",
        "The container image to use, default: nevercast/tinysoc:latest",
    ),
    (
        "clk_freq_hz",
        "Clock frequency to use for simulation and hardware builds, default: 16MHz",
    ),
];

/// A validated command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainPlan {
    pub commands: Vec<CommandKind>,
    pub container_name: Option<String>,
}

pub fn parse_arguments<S: AsRef<str>>(args: &[S]) -> Result<ChainPlan, UsageError> {
    let mut plan = ChainPlan::default();

    for arg in args {
        let arg = arg.as_ref();
        if let Some((key, value)) = arg.split_once('=') {
            match key {
                "container_name" => plan.container_name = Some(value.to_string()),
                "clk_freq_hz" => return Err(UsageError::NotImplemented(key.to_string())),
                _ => return Err(UsageError::UnknownParameter(key.to_string())),
            }
        } else if let Some(command) = CommandKind::parse(arg) {
            if plan.commands.contains(&command) {
                return Err(UsageError::DuplicateCommand(arg.to_string()));
            }
            plan.commands.push(command);
        } else {
            return Err(UsageError::UnknownArgument(arg.to_string()));
        }
    }

    if plan.commands.is_empty() {
        return Err(UsageError::NoCommands);
    }
    Ok(plan)
}

/// Help text listing parameters and commands, shown after clap's usage.
pub fn help_text() -> String {
    let mut text = String::from("Parameters:\n");
    for (name, about) in PARAMETERS {
        text.push_str(&format!("  {:<16} {}\n", name, about));
    }
    text.push_str("\nCommands:\n");
    for kind in CommandKind::value_variants() {
        let about = kind
            .to_possible_value()
            .and_then(|v| v.get_help().map(|h| h.to_string()))
            .unwrap_or_default();
        text.push_str(&format!("  {:<16} {}\n", kind.name(), about));
    }
    text.push_str("\nExample: build, test and program the board with default parameters\n");
    text.push_str("  socbuild build test program\n");
    text
}

/// Run `commands` in order. Stops at, and returns, the first failure.
pub fn run_chain(session: &mut Session, commands: &[CommandKind]) -> Result<()> {
    let total = commands.len();
    for (index, command) in commands.iter().enumerate() {
        session
            .sink
            .prefix_mut()
            .enter_command(index + 1, total, command.name());
        session.sink.info(&format!("Begin {}", command))?;
        command.run(session)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::capture_session;

    #[test]
    fn test_parse_commands_in_order() {
        let plan = parse_arguments(&["build", "test", "program"]).unwrap();
        assert_eq!(
            plan.commands,
            vec![CommandKind::Build, CommandKind::Test, CommandKind::Program]
        );
        assert_eq!(plan.container_name, None);
    }

    #[test]
    fn test_parameters_mix_with_commands() {
        let plan = parse_arguments(&["compile", "container_name=me/soc:dev", "build"]).unwrap();
        assert_eq!(plan.commands, vec![CommandKind::Compile, CommandKind::Build]);
        assert_eq!(plan.container_name.as_deref(), Some("me/soc:dev"));
    }

    #[test]
    fn test_parameter_value_may_contain_equals() {
        let plan = parse_arguments(&["container_name=a=b", "test"]).unwrap();
        assert_eq!(plan.container_name.as_deref(), Some("a=b"));
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(
            parse_arguments(&["build", "build"]),
            Err(UsageError::DuplicateCommand("build".into()))
        );
        assert_eq!(
            parse_arguments(&["flash"]),
            Err(UsageError::UnknownArgument("flash".into()))
        );
        assert_eq!(
            parse_arguments(&["speed=3", "build"]),
            Err(UsageError::UnknownParameter("speed".into()))
        );
        assert_eq!(
            parse_arguments(&["clk_freq_hz=12000000", "build"]),
            Err(UsageError::NotImplemented("clk_freq_hz".into()))
        );
        assert_eq!(
            parse_arguments(&["container_name=x"]),
            Err(UsageError::NoCommands)
        );
    }

    #[test]
    fn test_help_lists_everything() {
        let help = help_text();
        for (name, _) in PARAMETERS {
            assert!(help.contains(name));
        }
        for kind in CommandKind::value_variants() {
            assert!(help.contains(kind.name()));
        }
        assert!(help.contains("Simulate the test bench"));
    }

    #[test]
    fn test_chain_prefixes_each_command() {
        let (mut session, out, _err) = capture_session("docker");
        session.dry_run = true;

        run_chain(&mut session, &[CommandKind::Test, CommandKind::Build, CommandKind::Program]).unwrap();

        let lines = out.lines();
        assert!(lines.contains(&"[1/3] test: Begin test".to_string()));
        assert!(lines.contains(&"[2/3] build: Begin build".to_string()));
        assert!(lines.contains(&"[3/3] program: Begin program".to_string()));
        assert!(
            lines
                .iter()
                .filter(|l| l.starts_with("[2/3] build: "))
                .all(|l| !l.contains("Mounting")),
            "mount notice belongs to the first container command only"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_chain_stops_at_first_failure() {
        let (mut session, out, err) = capture_session("false");

        let error = run_chain(&mut session, &[CommandKind::Build, CommandKind::Test]).unwrap_err();

        assert_eq!(
            error
                .downcast_ref::<crate::errors::BuildError>()
                .map(|e| e.exit_code()),
            Some(1)
        );
        assert!(out.contents().contains("[1/2] build: Begin build"));
        assert!(!out.contents().contains("Begin test"));
        assert!(err.contents().contains("[1/2] build: "));
    }
}
