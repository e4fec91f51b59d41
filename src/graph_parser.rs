use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::graph_trait::Graph;
use crate::petgraph::PGraph;

#[derive(Debug, Error)]
pub enum GraphFileError {
    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("did not find header line 'n m k'")]
    MissingHeader,
    #[error("line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },
    #[error("line {line}: endpoint {vertex} is not in 1..={n}")]
    VertexOutOfRange { line: usize, vertex: usize, n: usize },
    #[error("line {line}: self-loop at vertex {vertex}")]
    SelfLoop { line: usize, vertex: usize },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> GraphFileError + '_ {
    move |source| GraphFileError::Io { path: path.to_path_buf(), source }
}

fn is_comment(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#') || line.starts_with('c')
}

fn parse_field(field: Option<&str>, line: usize, what: &str) -> Result<usize, GraphFileError> {
    let field = field.ok_or_else(|| GraphFileError::InvalidLine {
        line,
        reason: format!("missing {what}"),
    })?;
    field.parse::<usize>().map_err(|_| GraphFileError::InvalidLine {
        line,
        reason: format!("{what} '{field}' is not a non-negative integer"),
    })
}

/// reads a graph given as
///   n m k      (no. of vertices, no. of edges, unused)
///   u v w      (one line per edge, 1-based endpoints, weight is ignored)
/// lines starting with 'c' or '#' are comments
/// duplicate edges are ignored, self-loops are rejected
pub fn read_graph<R: BufRead>(reader: R) -> Result<PGraph, GraphFileError> {
    let mut lines = reader.lines().enumerate();
    let mut n: Option<usize> = None;
    for (idx, line) in lines.by_ref() {
        let line = line.map_err(|source| GraphFileError::Io { path: PathBuf::new(), source })?;
        if is_comment(&line) {
            continue;
        }
        n = Some(parse_field(line.split_whitespace().next(), idx + 1, "vertex count")?);
        break;
    }
    let n = n.ok_or(GraphFileError::MissingHeader)?;

    let mut g: PGraph = Graph::new(n);
    for (idx, line) in lines {
        let line = line.map_err(|source| GraphFileError::Io { path: PathBuf::new(), source })?;
        if is_comment(&line) {
            continue;
        }
        let line_no = idx + 1;
        let mut fields = line.split_whitespace();
        let u = parse_field(fields.next(), line_no, "first endpoint")?;
        let v = parse_field(fields.next(), line_no, "second endpoint")?;
        for vertex in [u, v] {
            if vertex == 0 || vertex > n {
                return Err(GraphFileError::VertexOutOfRange { line: line_no, vertex, n });
            }
        }
        if u == v {
            return Err(GraphFileError::SelfLoop { line: line_no, vertex: u });
        }
        g.add_edge(u - 1, v - 1);  // index shift --> first vertex has ID 0
    }
    Ok(g)
}

pub fn read_graph_from_file<P: AsRef<Path>>(file: P) -> Result<PGraph, GraphFileError> {
    let path = file.as_ref();
    let f = File::open(path).map_err(io_error(path))?;
    read_graph(io::BufReader::new(f)).map_err(|err| match err {
        GraphFileError::Io { source, .. } => GraphFileError::Io { path: path.to_path_buf(), source },
        other => other,
    })
}

/// writes 'tree' as "n m 0" followed by one "u v 0" line per edge (1-based)
pub fn write_solution<W: Write>(writer: &mut W, tree: &impl Graph) -> io::Result<()> {
    writeln!(writer, "{} {} 0", tree.size(), tree.edge_count())?;
    for (u, v) in tree.edges() {
        writeln!(writer, "{} {} 0", u + 1, v + 1)?;  // +1 -> undoes index shift
    }
    Ok(())
}

pub fn write_solution_to_file<P: AsRef<Path>>(file: P, tree: &impl Graph) -> Result<(), GraphFileError> {
    let path = file.as_ref();
    let f = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(f);
    write_solution(&mut writer, tree)
        .and_then(|_| writer.flush())
        .map_err(io_error(path))
}

/// returns the path of the solution file for 'instance' inside 'out_dir' ("sol_<file name>")
pub fn solution_path(instance: &Path, out_dir: &Path) -> PathBuf {
    let name = instance.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("graph.txt"));
    out_dir.join(format!("sol_{name}"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;
    use crate::graph_parser::*;
    use crate::graph_trait::Graph;

    #[test]
    fn test_read_graph() {
        let g = read_graph(Cursor::new("c comment\n4 4 0\n1 2 5\n2 3 1\n\n1 3 1\n3 4 1\n")).unwrap();
        assert_eq!(g.size(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.edges(), vec![(0,1), (1,2), (0,2), (2,3)]);

        // weight column is optional, duplicates are merged
        let g = read_graph(Cursor::new("3 3\n1 2\n2 1\n2 3\n")).unwrap();
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_read_graph_errors() {
        assert!(matches!(read_graph(Cursor::new("# nothing\n")), Err(GraphFileError::MissingHeader)));
        assert!(matches!(read_graph(Cursor::new("3 1 0\n1 x 0\n")),
                         Err(GraphFileError::InvalidLine { line: 2, .. })));
        assert!(matches!(read_graph(Cursor::new("3 1 0\n1\n")),
                         Err(GraphFileError::InvalidLine { line: 2, .. })));
        assert!(matches!(read_graph(Cursor::new("3 1 0\n1 4 0\n")),
                         Err(GraphFileError::VertexOutOfRange { vertex: 4, n: 3, .. })));
        assert!(matches!(read_graph(Cursor::new("3 1 0\n0 1 0\n")),
                         Err(GraphFileError::VertexOutOfRange { vertex: 0, .. })));
        assert!(matches!(read_graph(Cursor::new("3 1 0\n2 2 0\n")),
                         Err(GraphFileError::SelfLoop { vertex: 2, .. })));
        assert!(matches!(read_graph_from_file("test_instances/does_not_exist.txt"),
                         Err(GraphFileError::Io { .. })));
    }

    #[test]
    fn test_write_solution() {
        let g = read_graph_from_file("test_instances/path5.txt").unwrap();
        let mut out = Vec::new();
        write_solution(&mut out, &g).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "5 4 0\n1 2 0\n2 3 0\n3 4 0\n4 5 0\n");
    }

    #[test]
    fn test_solution_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let g = read_graph_from_file("test_instances/bridged_cycles.txt").unwrap();
        let path = solution_path(Path::new("instances/bridged_cycles.txt"), dir.path());
        assert!(path.ends_with("sol_bridged_cycles.txt"));
        write_solution_to_file(&path, &g).unwrap();
        let h = read_graph_from_file(&path).unwrap();
        assert_eq!(h.size(), g.size());
        assert_eq!(h.edges(), g.edges());
    }
}
