//! I/O 支持：文本图格式装载与 JSON 序列化接口。
//!
//! 文本格式为空白分隔的记号流：顶点数 `V`、边数 `E`，
//! 随后 `E` 个 `from to weight` 三元组。
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::graph::digraph::{GraphError, WeightedDigraph};
use crate::graph::ids::VertexId;
use crate::graph::index_vec::Idx;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("invalid graph text: {0}")]
    Format(String),
}

/// Parses the whitespace-separated `V E (from to weight)*` format.
pub fn parse_text(content: &str) -> Result<WeightedDigraph, IoError> {
    let mut tokens = content.split_whitespace();
    let mut next = |what: &str| {
        tokens
            .next()
            .ok_or_else(|| IoError::Format(format!("unexpected end of input, expected {what}")))
    };

    let vertex_count: usize = parse_token(next("vertex count")?, "vertex count")?;
    let edge_count: usize = parse_token(next("edge count")?, "edge count")?;

    let mut graph = WeightedDigraph::new(vertex_count);
    for i in 0..edge_count {
        let from: usize = parse_token(next("edge tail")?, &format!("tail of edge {i}"))?;
        let to: usize = parse_token(next("edge head")?, &format!("head of edge {i}"))?;
        let weight: f64 = parse_token(next("edge weight")?, &format!("weight of edge {i}"))?;
        graph.add_edge(VertexId::from_usize(from), VertexId::from_usize(to), weight)?;
    }
    Ok(graph)
}

fn parse_token<T: std::str::FromStr>(token: &str, what: &str) -> Result<T, IoError> {
    token
        .parse()
        .map_err(|_| IoError::Format(format!("cannot parse {what} from {token:?}")))
}

pub fn read_text<P: AsRef<Path>>(path: P) -> Result<WeightedDigraph, IoError> {
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    parse_text(&content)
}

pub fn to_json_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(s)?)
}

pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), IoError> {
    let mut file = File::create(path)?;
    let content = to_json_string(value)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn read_json<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T, IoError> {
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    from_json_str(&content)
}
