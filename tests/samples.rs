
use test_generator::test_resources;

use bstgroovy::{compile_file, CompileOptions};

/// Collects the `%! ` lines of a sample. A `%!` without the space is most likely a typo.
fn expectations(input: &str) -> Vec<&str> {
    input
        .lines()
        .filter_map(|line| {
            if let Some(expected) = line.strip_prefix("%! ") {
                Some(Ok(expected))
            } else if line.starts_with("%!") {
                Some(Err("Likely a typo: Put a space after \"%!\""))
            } else {
                None
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .expect("No issue with special comments")
}

#[test_resources("samples/successful/**/*.bst")]
fn compile_sample(resource: &str) {
    let input = std::fs::read_to_string(resource).expect("Read successful");

    let script = match compile_file(resource, &CompileOptions::default()) {
        Ok(script) => script,
        Err(err) => panic!("{resource} should compile, but got:\n{err}"),
    };
    println!("{script}");

    for expected in expectations(&input) {
        assert!(script.contains(expected), "Generated code should contain '{expected}'");
    }
}

#[test_resources("samples/failing/**/*.bst")]
fn reject_sample(resource: &str) {
    let input = std::fs::read_to_string(resource).expect("Read successful");

    let message = match compile_file(resource, &CompileOptions::default()) {
        Ok(script) => panic!("{resource} should not compile, but produced:\n{script}"),
        Err(err) => err.to_string(),
    };
    println!("{message}");

    let expected = expectations(&input);
    assert!(!expected.is_empty(), "Failing samples must say which error they expect");
    for expected in expected {
        assert!(message.contains(expected), "Error message should contain '{expected}'");
    }
}
