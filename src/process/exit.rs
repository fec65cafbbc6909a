use super::invoke::{ExitOutcome, ProcessHandle};
use crate::errors::BuildError;
use crate::output::OutputSink;
use anyhow::Result;

/// Exit codes accepted when the caller has no special requirements.
pub const SUCCESS_ONLY: &[i32] = &[0];

/// Decide whether a finished process may let the chain continue.
///
/// An unknown status is not a failure. A status outside `allowed` is logged
/// once and returned as [`BuildError::ChildFailed`], which the binary turns
/// into its own exit code.
pub fn check(sink: &mut OutputSink, handle: &ProcessHandle, allowed: &[i32]) -> Result<()> {
    let code = match handle.outcome() {
        ExitOutcome::Running => return Ok(()),
        ExitOutcome::Code(code) if allowed.contains(&code) => return Ok(()),
        ExitOutcome::Code(code) => {
            sink.error(&format!("Process failed to exit cleanly, errno: {}", code))?;
            code
        }
        ExitOutcome::Signal(signal) => {
            sink.error(&format!("Process terminated by signal {}", signal))?;
            128 + signal
        }
    };

    Err(BuildError::ChildFailed {
        program: handle.program().to_string(),
        code,
    }
    .into())
}

pub fn check_success(sink: &mut OutputSink, handle: &ProcessHandle) -> Result<()> {
    check(sink, handle, SUCCESS_ONLY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::capture_sink;

    #[test]
    fn test_pending_status_is_no_decision() {
        let (mut sink, out, err) = capture_sink();
        let handle = ProcessHandle::pending(vec!["docker".into()]);

        assert!(check_success(&mut sink, &handle).is_ok());
        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::process::Invocation;

        fn exit_with(code: i32) -> ProcessHandle {
            let (mut sink, _out, _err) = capture_sink();
            Invocation::new("sh")
                .args(["-c", &format!("exit {}", code)])
                .run(&mut sink)
                .unwrap()
        }

        #[test]
        fn test_success_is_silent() {
            let (mut sink, out, err) = capture_sink();
            assert!(check_success(&mut sink, &exit_with(0)).is_ok());
            assert!(out.contents().is_empty());
            assert!(err.contents().is_empty());
        }

        #[test]
        fn test_allowed_nonzero_code_passes() {
            let (mut sink, _out, err) = capture_sink();
            assert!(check(&mut sink, &exit_with(1), &[0, 1]).is_ok());
            assert!(err.contents().is_empty());
        }

        #[test]
        fn test_failure_logs_and_carries_code() {
            let (mut sink, _out, err) = capture_sink();
            sink.prefix_mut().enter_command(1, 2, "test");

            let error = check_success(&mut sink, &exit_with(2)).unwrap_err();

            match error.downcast_ref::<BuildError>() {
                Some(BuildError::ChildFailed { program, code }) => {
                    assert_eq!(program, "sh");
                    assert_eq!(*code, 2);
                }
                other => panic!("unexpected error: {:?}", other),
            }
            let logged = err.lines();
            assert_eq!(logged.len(), 1);
            assert!(logged[0].starts_with("[1/2] test: "));
            assert!(logged[0].contains("Process failed to exit cleanly, errno: 2"));
        }

        #[test]
        fn test_zero_outside_allowed_set_fails() {
            let (mut sink, _out, _err) = capture_sink();
            assert!(check(&mut sink, &exit_with(0), &[1]).is_err());
        }
    }
}
