use clap::{load_yaml, value_t, values_t, App, AppSettings, ArgMatches};
use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use shardgraph::{
    error::Error as ShardError,
    filenames::{load_intervals, load_translate, vertex_name},
    shard::{NeighborCollector, ShardStore},
    translate::VertexIdTranslate,
    types::VId,
};
use std::error::Error;

struct Graph<'a> {
    base: &'a str,
    num_shards: usize,
    translate: VertexIdTranslate,
    names: bool,
}

impl<'a> Graph<'a> {
    fn new(matches: &'a ArgMatches) -> Result<Self, Box<dyn Error>> {
        let base = matches.value_of("BASE").unwrap();
        let num_shards = value_t!(matches, "NSHARDS", usize).unwrap_or_else(|e| e.exit());
        let translate = if matches.is_present("internal") {
            VertexIdTranslate::Identity
        } else {
            load_translate(base, num_shards)?
        };
        Ok(Self {
            base,
            num_shards,
            translate,
            names: matches.is_present("names"),
        })
    }

    /// Formats an internal vertex id for printing.
    fn display(&self, internal: VId) -> Result<String, ShardError> {
        let orig = self.translate.backward(internal);
        if self.names {
            vertex_name(self.base, orig)
        } else {
            Ok(orig.to_string())
        }
    }

    fn print(&self, vid: VId, neighbors: &[VId]) -> Result<(), ShardError> {
        println!(
            "{}: {}",
            self.display(vid)?,
            neighbors
                .iter()
                .map(|&n| self.display(n))
                .collect::<Result<Vec<_>, _>>()?
                .join(" ")
        );
        Ok(())
    }
}

fn handle_out(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let graph = Graph::new(matches)?;
    let ids = values_t!(matches, "VERTEX", VId)
        .unwrap_or_else(|e| e.exit())
        .into_iter()
        .map(|v| graph.translate.forward(v))
        .collect_vec();
    let time_start = std::time::Instant::now();
    let answers = (0..graph.num_shards)
        .into_par_iter()
        .map(|shard_num| -> Result<NeighborCollector, ShardError> {
            let store = ShardStore::open(graph.base, shard_num, graph.num_shards)?;
            let mut collector = NeighborCollector::new();
            store.query_out(ids.iter().copied(), &mut collector)?;
            Ok(collector)
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!("queried {} shards in {:?}", answers.len(), time_start.elapsed());
    for &vid in &ids {
        let neighbors = answers
            .iter()
            .flat_map(|collector| collector.out_ids(vid).unwrap_or(&[]))
            .copied()
            .collect_vec();
        graph.print(vid, &neighbors)?;
    }
    Ok(())
}

fn handle_in(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let graph = Graph::new(matches)?;
    let orig = value_t!(matches, "VERTEX", VId).unwrap_or_else(|e| e.exit());
    let vid = graph.translate.forward(orig);
    let shard_num = load_intervals(graph.base, graph.num_shards)?
        .iter()
        .position(|interval| interval.contains(vid))
        .ok_or_else(|| format!("vertex {} is not part of any shard", orig))?;
    let store = ShardStore::open(graph.base, shard_num, graph.num_shards)?;
    let mut collector = NeighborCollector::new();
    store.query_in(vid, &mut collector)?;
    graph.print(vid, collector.in_ids(vid).unwrap_or(&[]))?;
    Ok(())
}

fn handle_translate(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let graph = Graph::new(matches)?;
    let vid = value_t!(matches, "VERTEX", VId).unwrap_or_else(|e| e.exit());
    if matches.is_present("backward") {
        println!("{}", graph.translate.backward(vid));
    } else {
        println!("{}", graph.translate.forward(vid));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let yaml = load_yaml!("cli.yml");
    let matches = App::from_yaml(yaml)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .get_matches();
    if let Some(matches) = matches.subcommand_matches("out") {
        handle_out(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("in") {
        handle_in(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("translate") {
        handle_translate(matches)?;
    }
    Ok(())
}
