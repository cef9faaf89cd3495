//! Reader for the SNDlib native network format.
//!
//! Only the `NODES` and `LINKS` sections are interpreted; `META`, `DEMANDS`,
//! `ADMISSIBLE_PATHS` and coordinates are skipped. A link's capacity is its
//! pre-installed capacity when that is positive, otherwise the largest module
//! capacity offered for it.

use crate::api::topology_dto::{LinkDto, NodeDto, TopologyDto};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Nodes,
    Links,
    Other,
}

pub fn parse_sndlib_str(input: &str) -> Result<TopologyDto> {
    let mut name = None;
    let mut nodes = Vec::new();
    let mut links = Vec::new();
    let mut section = Section::None;
    // Open parentheses inside a skipped section, its own included.
    let mut skipped_depth = 0usize;

    for (line_idx, raw_line) in input.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw_line.trim();

        if line.starts_with('?') || line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if name.is_none() {
                name = comment.trim().strip_prefix("network").map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
            }
            continue;
        }

        if section == Section::None {
            section = match line.split_whitespace().next() {
                Some("NODES") => Section::Nodes,
                Some("LINKS") => Section::Links,
                Some(_) => Section::Other,
                None => Section::None,
            };
            if !line.ends_with('(') {
                return Err(parse_error(line_no, format!("expected '(' to open section, found '{}'", line)));
            }
            skipped_depth = 1;
            continue;
        }

        if section == Section::Other {
            // Blocks such as ADMISSIBLE_PATHS nest their own parentheses.
            for token in tokenize(line) {
                match token {
                    "(" => skipped_depth += 1,
                    ")" => skipped_depth = skipped_depth.saturating_sub(1),
                    _ => {}
                }
            }
            if skipped_depth == 0 {
                section = Section::None;
            }
            continue;
        }

        if line == ")" {
            section = Section::None;
            continue;
        }

        match section {
            Section::Nodes => nodes.push(parse_node_line(line, line_no)?),
            Section::Links => links.push(parse_link_line(line, line_no)?),
            Section::Other | Section::None => {}
        }
    }

    if section != Section::None {
        return Err(parse_error(input.lines().count(), "unterminated section at end of input".to_string()));
    }

    Ok(TopologyDto { name, nodes, links })
}

fn parse_node_line(line: &str, line_no: usize) -> Result<NodeDto> {
    let tokens = tokenize(line);
    match tokens.first() {
        Some(id) if *id != "(" && *id != ")" => Ok(NodeDto { id: id.to_string() }),
        _ => Err(parse_error(line_no, format!("malformed node line '{}'", line))),
    }
}

// <link_id> ( <source> <target> ) <pre_installed_capacity> <pre_installed_capacity_cost> <routing_cost> <setup_cost> ( {<module_capacity> <module_cost>}* )
fn parse_link_line(line: &str, line_no: usize) -> Result<LinkDto> {
    let tokens = tokenize(line);

    if tokens.len() < 11 || tokens[1] != "(" || tokens[4] != ")" || tokens[9] != "(" || tokens.last() != Some(&")") {
        return Err(parse_error(line_no, format!("malformed link line '{}'", line)));
    }

    let pre_installed = parse_number(tokens[5], line_no)?;

    let module_tokens = &tokens[10..tokens.len() - 1];
    if module_tokens.len() % 2 != 0 {
        return Err(parse_error(line_no, "module list must contain (capacity, cost) pairs".to_string()));
    }

    let mut max_module_capacity = 0.0_f64;
    for pair in module_tokens.chunks(2) {
        max_module_capacity = max_module_capacity.max(parse_number(pair[0], line_no)?);
    }

    let capacity = if pre_installed > 0.0 { pre_installed } else { max_module_capacity };

    Ok(LinkDto { id: tokens[0].to_string(), source: tokens[2].to_string(), target: tokens[3].to_string(), capacity })
}

fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (i, c) in line.char_indices() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(&line[s..i]);
            }
            if c == '(' || c == ')' {
                tokens.push(&line[i..i + 1]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if let Some(s) = start {
        tokens.push(&line[s..]);
    }

    tokens
}

fn parse_number(token: &str, line_no: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| parse_error(line_no, format!("'{}' is not a number", token)))
}

fn parse_error(line: usize, message: String) -> Error {
    Error::TopologyParseError { line, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "?SNDlib native format; type: network; version: 1.0
# network triangle

META (
  granularity = 1month
)

NODES (
  A ( 1.00 2.00 )
  B ( 3.00 4.00 )
  C ( 5.00 6.00 )
)

LINKS (
  L1 ( A B ) 0.00 0.00 0.00 0.00 ( 40.00 1.00 160.00 3.00 )
  L2 ( B C ) 25.00 0.00 0.00 0.00 ( 40.00 1.00 )
  L3 ( C A ) 0.00 0.00 0.00 0.00 ( 10.00 1.00 )
)

DEMANDS (
  D1 ( A C ) 1 12.00 UNLIMITED
)
";

    #[test]
    fn parses_nodes_and_links() {
        let topology = parse_sndlib_str(TRIANGLE).unwrap();

        assert_eq!(topology.name.as_deref(), Some("triangle"));
        let node_ids: Vec<&str> = topology.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(node_ids, vec!["A", "B", "C"]);

        assert_eq!(topology.links.len(), 3);
        assert_eq!(topology.links[0].source, "A");
        assert_eq!(topology.links[0].target, "B");
    }

    #[test]
    fn capacity_prefers_pre_installed_then_largest_module() {
        let topology = parse_sndlib_str(TRIANGLE).unwrap();

        assert_eq!(topology.links[0].capacity, 160.0);
        assert_eq!(topology.links[1].capacity, 25.0);
        assert_eq!(topology.links[2].capacity, 10.0);
    }

    #[test]
    fn tokenizer_splits_parentheses() {
        assert_eq!(tokenize("L1 (A B) 1.0"), vec!["L1", "(", "A", "B", ")", "1.0"]);
    }

    #[test]
    fn malformed_link_reports_line_number() {
        let input = "NODES (\n A ( 0 0 )\n)\nLINKS (\n L1 ( A ) 0 0\n)\n";
        match parse_sndlib_str(input) {
            Err(Error::TopologyParseError { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn nested_admissible_paths_are_skipped() {
        let input = "NODES (\n A ( 0 0 )\n B ( 1 1 )\n)\nLINKS (\n L1 ( A B ) 10.00 0.00 0.00 0.00 ( )\n)\nADMISSIBLE_PATHS (\n  D1 (\n    P_0 ( L1 )\n  )\n)\n";
        let topology = parse_sndlib_str(input).unwrap();

        assert_eq!(topology.nodes.len(), 2);
        assert_eq!(topology.links.len(), 1);
        assert_eq!(topology.links[0].capacity, 10.0);
    }

    #[test]
    fn unclosed_nested_block_is_rejected() {
        let input = "NODES (\n A ( 0 0 )\n)\nADMISSIBLE_PATHS (\n  D1 (\n    P_0 ( L1 )\n)\n";
        assert!(matches!(parse_sndlib_str(input), Err(Error::TopologyParseError { .. })));
    }

    #[test]
    fn unterminated_section_is_rejected() {
        let input = "NODES (\n A ( 0 0 )\n";
        assert!(matches!(parse_sndlib_str(input), Err(Error::TopologyParseError { .. })));
    }
}
