use crate::config::SimulatorConfig;
use crate::error::InvocationFailure;
use crate::invoker::{ExternalSimulator, Invoke};
use super::point;

fn shell(script: &str) -> SimulatorConfig {
    SimulatorConfig {
        program: String::from("sh"),
        tool_args: vec![String::from("-c"), script.to_string()],
        cache_size_flag: String::from("-dl1_c"),
        block_size_flag: String::from("-b"),
        associativity_flag: String::from("-dl1_a"),
        workload: Vec::new(),
    }
}

#[test]
fn builds_pin_style_command_line() -> Result<(), Box<dyn std::error::Error>> {
    let config: SimulatorConfig = serde_json::from_str(
        r#"{ "program": "/opt/pin/pin", "tool_args": ["-t", "/opt/cacheSim/obj-intel64/cache.so"] }"#,
    )?;
    let simulator = ExternalSimulator::new(config);
    assert_eq!(
        simulator.command_line(&point(32, 64, 8)),
        vec!["-t", "/opt/cacheSim/obj-intel64/cache.so", "-dl1_c", "32", "-b", "64", "-dl1_a", "8", "--", "./matrixMultSimple"]
    );
    Ok(())
}

#[test]
fn omits_separator_without_workload() {
    let simulator = ExternalSimulator::new(shell("true"));
    let args = simulator.command_line(&point(1, 2, 3));
    assert_eq!(args.last().map(String::as_str), Some("3"));
    assert!(!args.iter().any(|a| a == "--"));
}

#[cfg(unix)]
#[test]
fn puts_stderr_before_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let mut simulator = ExternalSimulator::new(shell("echo out; echo err >&2"));
    assert_eq!(simulator.invoke(&point(32, 64, 8))?, "err\nout\n");
    Ok(())
}

#[cfg(unix)]
#[test]
fn passes_axis_values_as_arguments() -> Result<(), Box<dyn std::error::Error>> {
    // sh -c puts the first argument after the script in $0
    let mut simulator = ExternalSimulator::new(shell(r#"printf '%s\n' "$0 $1 $2 $3 $4 $5""#));
    assert_eq!(simulator.invoke(&point(256, 32, 4))?, "-dl1_c 256 -b 32 -dl1_a 4\n");
    Ok(())
}

#[cfg(unix)]
#[test]
fn non_zero_exit_is_a_failure() {
    let mut simulator = ExternalSimulator::new(shell("echo partial; echo boom >&2; exit 1"));
    match simulator.invoke(&point(32, 64, 8)) {
        Err(InvocationFailure::Exit { status, stderr }) => {
            assert_eq!(status, Some(1));
            assert_eq!(stderr, "boom\n");
        }
        other => panic!("expected an exit failure, got {other:?}"),
    }
}

#[test]
fn missing_program_is_a_failure() {
    let mut config = shell("true");
    config.program = String::from("/nonexistent/cache-simulator");
    let mut simulator = ExternalSimulator::new(config);
    match simulator.invoke(&point(32, 64, 8)) {
        Err(InvocationFailure::Spawn { program, .. }) => assert_eq!(program, "/nonexistent/cache-simulator"),
        other => panic!("expected a spawn failure, got {other:?}"),
    }
}
