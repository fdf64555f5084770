use richards::sim;

fn parse_usize_list(arg: &str) -> Option<Vec<usize>> {
    if arg == "-" {
        return None;
    }
    let mut values = Vec::new();
    for part in arg.split(',') {
        if part.trim().is_empty() {
            return None;
        }
        let value = part.trim().parse::<usize>().ok()?;
        values.push(value);
    }
    Some(values)
}

fn print_usage(program: &str) {
    println!("Richards scheduler benchmark");
    println!("Usage:");
    println!("  {program} (run demo)");
    println!("  {program} bench [iterations] [trace]");
    println!("  {program} stress [iteration_sets]");
    println!("  {program} --help");
    println!();
    println!("Sets are comma-separated lists (e.g., 1,10,100). Use \"-\" to keep the default set.");
    println!("Defaults:");
    println!("  bench  iterations={}", sim::DEFAULT_BENCH_ITERATIONS);
    println!(
        "  stress iteration_sets={}",
        sim::DEFAULT_STRESS_SETS
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    );
    println!("Flags:");
    println!("  trace  print each task step and device payload");
}

fn exit_with_usage(program: &str, message: &str) -> ! {
    eprintln!("{message}");
    print_usage(program);
    std::process::exit(2);
}

fn exit_with_outcome(ok: bool) -> ! {
    std::process::exit(if ok { 0 } else { 1 });
}

fn main() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "richards".to_string());
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("bench") => {
            let mut iterations = None;
            let mut trace = false;
            for arg in args {
                match arg.as_str() {
                    "trace" => trace = true,
                    _ if iterations.is_none() => match arg.parse::<usize>() {
                        Ok(value) => iterations = Some(value),
                        Err(_) => exit_with_usage(
                            &program,
                            &format!("bench: invalid iterations value: {arg}"),
                        ),
                    },
                    _ => exit_with_usage(&program, &format!("bench: unexpected argument: {arg}")),
                }
            }
            exit_with_outcome(sim::run_benchmark(iterations, trace));
        }
        Some("stress") => {
            let mut iteration_sets: Option<Vec<usize>> = None;
            let mut consumed = false;
            for arg in args {
                if consumed {
                    exit_with_usage(&program, &format!("stress: unexpected argument: {arg}"));
                }
                consumed = true;
                if arg == "-" {
                    continue;
                }
                match parse_usize_list(&arg) {
                    Some(values) => iteration_sets = Some(values),
                    None => exit_with_usage(
                        &program,
                        &format!("stress: invalid iteration_sets value: {arg}"),
                    ),
                }
            }
            exit_with_outcome(sim::run_stress(iteration_sets));
        }
        Some("--help") | Some("-h") | Some("help") => print_usage(&program),
        Some(other) => {
            exit_with_usage(&program, &format!("unknown command: {other}"));
        }
        None => exit_with_outcome(sim::run_demo()),
    }
}
