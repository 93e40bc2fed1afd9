use std::process::Command;

fn sim_garden(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_sim-garden"))
        .args(args)
        .output()
        .expect("failed to launch sim-garden")
}

#[test]
fn headless_blinker_oscillates() {
    let output = sim_garden(&[
        "--headless",
        "--inline",
        "--pattern",
        "blinker",
        "--rows",
        "5",
        "--columns",
        "5",
        "--ticks",
        "1",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let expected = "\
.....
..#..
..#..
..#..
.....
step 1: population 3/25 (12.0%) [0:22 1:3]
";
    assert_eq!(stdout, expected);
}

#[test]
fn headless_runs_agree_between_worker_and_inline() {
    let args = [
        "--headless",
        "--pattern",
        "random",
        "--seed",
        "7",
        "--rows",
        "30",
        "--columns",
        "40",
        "--ticks",
        "25",
    ];
    let worker = sim_garden(&args);
    let mut inline_args = args.to_vec();
    inline_args.push("--inline");
    let inline = sim_garden(&inline_args);

    assert!(worker.status.success());
    assert!(inline.status.success());
    assert_eq!(worker.stdout, inline.stdout);
}

#[test]
fn rate_above_the_classic_cap_is_rejected() {
    let output = sim_garden(&["--headless", "--tick-rate", "50"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "stderr: {stderr}");
}

#[test]
fn list_prints_every_option_id() {
    let output = sim_garden(&["--list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in [
        "classic/conway",
        "classic/briansBrain",
        "ants/langton",
        "ants/turmites",
        "gliderGun",
    ] {
        assert!(stdout.contains(id), "missing {id}");
    }
}
