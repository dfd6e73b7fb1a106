use std::env;
use std::process::ExitCode;

use footfall::graph::Graph;
use footfall::util::trace::initialize_tracer;

fn main() -> ExitCode {
    initialize_tracer();

    let mut args = env::args_os().skip(1);
    let (Some(nodes), Some(edges)) = (args.next(), args.next()) else {
        eprintln!("usage: footfall <nodes.csv> <edges.csv>");
        return ExitCode::from(2);
    };

    match Graph::from_csv(&nodes, &edges) {
        Ok(graph) => {
            let summary = graph.summary();
            println!("nodes:     {}", summary.nodes);
            println!("edges:     {}", summary.edges);
            println!("connected: {}", summary.connected);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to load graph. Reason: {err}");
            ExitCode::FAILURE
        }
    }
}
