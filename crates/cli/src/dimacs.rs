//! A byte-range-chunked, mmap'd reader for DIMACS-style shortest-path
//! files (`spec.md` §6.2).
//!
//! Three line kinds matter: `c ...` comments (ignored), one `p sp N_v
//! N_e` problem line declaring the vertex and edge counts, and `a u v
//! w` arc lines. DIMACS vertex ids are 1-based; every parsed id is
//! shifted down by one so the rest of this codebase only ever sees the
//! `0..N_v` range `pxgl_builder` expects. Any other line prefix is
//! logged and skipped rather than treated as a parse error, since real
//! DIMACS corpora carry stray blank lines and vendor-specific comment
//! variants.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use atoi::FromRadix10;
use log::{info, warn};
use parking_lot::Mutex;
use pxgl_builder::{Edge, EdgeList, VertexId, Weight};

#[derive(Debug, thiserror::Error)]
pub enum DimacsError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("no 'p sp N_v N_e' problem line found")]
    MissingProblemLine,
}

/// Parses a DIMACS file at `path` into an in-memory [`EdgeList`],
/// splitting the mmap'd contents into one chunk per physical core and
/// parsing each chunk on its own scoped thread, the same chunking
/// scheme a flat edge-list reader uses for a plain `src dst [weight]`
/// file.
pub fn read_edge_list(path: &Path) -> Result<EdgeList, DimacsError> {
    let file = File::open(path)?;
    let mmap = unsafe { memmap2::MmapOptions::new().populate().map(&file)? };
    parse(&mmap)
}

fn parse(bytes: &[u8]) -> Result<EdgeList, DimacsError> {
    let start = std::time::Instant::now();

    let num_vertices = find_num_vertices(bytes)?;

    let page_size = page_size::get();
    let cpu_count = num_cpus::get_physical();
    let chunk_size = (usize::max(1, bytes.len() / cpu_count) + (page_size - 1)) & !(page_size - 1);

    info!("page_size = {page_size}, cpu_count = {cpu_count}, chunk_size = {chunk_size}");

    let all_edges = Arc::new(Mutex::new(Vec::new()));

    std::thread::scope(|s| {
        for chunk_start in (0..bytes.len()).step_by(chunk_size) {
            let all_edges = Arc::clone(&all_edges);
            s.spawn(move || {
                let (start, end) = realign_to_lines(bytes, chunk_start, chunk_size);
                let edges = parse_lines(&bytes[start..end]);
                all_edges.lock().extend(edges);
            });
        }
    });

    let edges = Arc::try_unwrap(all_edges).unwrap().into_inner();
    let elapsed = start.elapsed();
    info!("parsed {} arcs from {} vertices in {:?}", edges.len(), num_vertices, elapsed);

    Ok(EdgeList::with_num_vertices(edges, num_vertices))
}

/// Scans the whole file once for the `p sp N_v N_e` header; cheap
/// relative to the edge parse itself and needed up front since
/// `EdgeList::with_num_vertices` wants a declared vertex count before
/// any arc is parsed.
fn find_num_vertices(bytes: &[u8]) -> Result<u64, DimacsError> {
    for line in bytes.split(|&b| b == b'\n') {
        let line = strip_cr(line);
        if let Some(rest) = line.strip_prefix(b"p sp ") {
            let (num_vertices, consumed) = u64::from_radix_10(rest);
            if consumed == 0 {
                continue;
            }
            return Ok(num_vertices + 1);
        }
    }
    Err(DimacsError::MissingProblemLine)
}

/// Extends `chunk_start..chunk_start+chunk_size` forward and backward
/// to the nearest newline boundaries so no line is split across two
/// chunks, the same forward/backward realignment a chunked edge-list
/// reader uses.
fn realign_to_lines(bytes: &[u8], chunk_start: usize, chunk_size: usize) -> (usize, usize) {
    let mut end = usize::min(chunk_start + chunk_size, bytes.len());
    while end < bytes.len() && bytes[end - 1] != b'\n' {
        end += 1;
    }

    let mut start = chunk_start;
    if start != 0 {
        while bytes[start - 1] != b'\n' {
            start += 1;
        }
    }

    (start, end)
}

fn parse_lines(chunk: &[u8]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for line in chunk.split(|&b| b == b'\n') {
        let line = strip_cr(line);
        if line.is_empty() || line[0] == b'c' || line[0] == b'p' {
            continue;
        }
        if line[0] != b'a' {
            warn!("skipping line with unrecognized prefix: {:?}", String::from_utf8_lossy(line));
            continue;
        }
        match parse_arc(line) {
            Some(edge) => edges.push(edge),
            None => warn!("skipping malformed arc line: {:?}", String::from_utf8_lossy(line)),
        }
    }
    edges
}

/// Parses one `a u v w` line. DIMACS ids are 1-based; both endpoints
/// are shifted down by one on the way in.
fn parse_arc(line: &[u8]) -> Option<Edge> {
    let rest = line.strip_prefix(b"a ")?;
    let (source, n) = u64::from_radix_10(rest);
    if n == 0 {
        return None;
    }
    let rest = skip_spaces(&rest[n..]);

    let (dest, n) = u64::from_radix_10(rest);
    if n == 0 {
        return None;
    }
    let rest = skip_spaces(&rest[n..]);

    let (weight, n) = u64::from_radix_10(rest);
    if n == 0 {
        return None;
    }

    if source == 0 || dest == 0 {
        return None;
    }

    Some(Edge {
        source: VertexId::new(source - 1),
        dest: VertexId::new(dest - 1),
        weight: Weight(weight),
    })
}

fn skip_spaces(bytes: &[u8]) -> &[u8] {
    let mut i = 0;
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    &bytes[i..]
}

fn strip_cr(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\r") {
        Some(stripped) => stripped,
        None => line,
    }
}
