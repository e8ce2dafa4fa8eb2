//! 命令行入口：装载文本格式图，运行有根连通度估计并打印结果。
use anyhow::{Context, bail};
use clap::{Arg, ArgAction, Command};

use rooted_cut::engine::{EngineOptions, RootedConnectivityEngine};
use rooted_cut::flow::{Algorithm, FlowOptions};
use rooted_cut::graph::{VertexId, io};
use rooted_cut::oracle::brute_force_rooted_cut;

fn make_parser() -> Command {
    Command::new("rcut")
        .about("Rooted connectivity estimation on weighted digraphs")
        .version("v0.1.0")
        .arg(
            Arg::new("graph")
                .required(true)
                .value_name("FILE")
                .help("Graph file: V, E, then E whitespace-separated `from to weight` triples"),
        )
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .default_value("0")
                .help("Root vertex"),
        )
        .arg(
            Arg::new("k1")
                .long("k1")
                .help("Minimum sink size bound (default: max(1, floor(sqrt(V))))"),
        )
        .arg(
            Arg::new("k2")
                .long("k2")
                .help("Maximum sink size bound (default: max(k1, V / 2))"),
        )
        .arg(
            Arg::new("algorithm")
                .short('a')
                .long("algorithm")
                .default_value("augmenting")
                .value_parser(["augmenting", "push-relabel"])
                .help("Max-flow strategy"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .default_value("0")
                .help("Seed for the sampling pass"),
        )
        .arg(
            Arg::new("max-rounds")
                .long("max-rounds")
                .help("Per-call max-flow iteration budget"),
        )
        .arg(
            Arg::new("brute-force")
                .long("brute-force")
                .action(ArgAction::SetTrue)
                .help("Also run the exhaustive oracle (tiny graphs only)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the cut result as JSON"),
        )
        .arg(
            Arg::new("dot")
                .long("dot")
                .action(ArgAction::SetTrue)
                .help("Dump the loaded graph in Graphviz dot format and exit"),
        )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let matches = make_parser().get_matches();

    let path = matches
        .get_one::<String>("graph")
        .context("missing graph file")?;
    let graph = io::read_text(path).with_context(|| format!("cannot load graph from {path}"))?;
    let vertex_count = graph.vertex_count();
    if vertex_count == 0 {
        bail!("graph has no vertices");
    }

    if matches.get_flag("dot") {
        print!("{}", graph.to_dot());
        return Ok(());
    }

    let root: usize = parse_arg(&matches, "root")?;
    if root >= vertex_count {
        bail!("root {root} is not between 0 and {}", vertex_count - 1);
    }
    let k1 = match matches.get_one::<String>("k1") {
        Some(_) => parse_arg(&matches, "k1")?,
        None => (vertex_count as f64).sqrt().floor().max(1.0) as usize,
    };
    let k2 = match matches.get_one::<String>("k2") {
        Some(_) => parse_arg(&matches, "k2")?,
        None => (vertex_count / 2).max(k1),
    };
    if k1 < 1 || k1 > k2 || k2 > vertex_count {
        bail!("size bounds must satisfy 1 <= k1 <= k2 <= {vertex_count}, got k1={k1}, k2={k2}");
    }

    let algorithm: Algorithm = matches
        .get_one::<String>("algorithm")
        .map(String::as_str)
        .unwrap_or("augmenting")
        .parse()
        .map_err(anyhow::Error::msg)?;
    let seed: u64 = parse_arg(&matches, "seed")?;
    let max_rounds = match matches.get_one::<String>("max-rounds") {
        Some(_) => Some(parse_arg(&matches, "max-rounds")?),
        None => None,
    };

    let engine = RootedConnectivityEngine::new(EngineOptions {
        algorithm,
        seed,
        flow: FlowOptions { max_rounds },
    });
    let cut = engine.rooted_min_cut(&graph, VertexId::new(root as u32), k1, k2)?;

    if matches.get_flag("json") {
        println!("{}", io::to_json_string(&cut)?);
    } else {
        println!("minimal r-cut estimate from root {root}: {cut}");
    }

    if matches.get_flag("brute-force") {
        let exact = brute_force_rooted_cut(&graph, VertexId::new(root as u32))?;
        println!("exhaustive minimum rooted cut: {exact}");
    }

    Ok(())
}

fn parse_arg<T>(matches: &clap::ArgMatches, name: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .get_one::<String>(name)
        .with_context(|| format!("missing value for --{name}"))?
        .parse()
        .with_context(|| format!("invalid value for --{name}"))
}
