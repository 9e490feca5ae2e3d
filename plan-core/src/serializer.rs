//! Plan file text form.
//!
//! Writing marshals the plan into a `serde_yaml::Value`, walks that tree into
//! indented lines tagged with their key and nesting depth, then runs a key
//! stack over the lines to find each field's dotted path and insert registry
//! comments above it. Reading parses the text, then migrates and defaults.

use serde_yaml::{Mapping, Sequence, Value};
use tracing::debug;

use crate::{
    comments::{working_copy, WorkingCopy},
    defaults::apply_defaults,
    error::PlanError,
    migrate::migrate,
    model::Plan,
};

const INDENT: usize = 2;

/// One line of rendered YAML. Lines that open a mapping key carry the key and
/// the number of keys enclosing it; all others have `key: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub depth: usize,
    pub key: Option<String>,
    pub text: String,
}

pub fn from_yaml(text: &str) -> Result<Plan, PlanError> {
    let mut plan: Plan = serde_yaml::from_str(text).map_err(PlanError::Parse)?;
    migrate(&mut plan);
    apply_defaults(&mut plan);
    Ok(plan)
}

pub fn to_annotated_yaml(plan: &Plan) -> Result<String, PlanError> {
    let value = serde_yaml::to_value(plan).map_err(PlanError::Marshal)?;
    let lines = render(&value)?;
    annotate(&lines, working_copy())
}

/// Renders a scalar with serde_yaml so quoting matches what the reader
/// expects. Multi-line strings come back as a block scalar whose body lines
/// are already indented one level.
///
/// A block scalar with keep chomping (`|+`) owns every trailing blank line,
/// including the separators the annotator inserts after it, so those strings
/// are written double-quoted instead.
fn scalar_lines(value: &Value) -> Result<Vec<String>, PlanError> {
    let rendered = serde_yaml::to_string(value).map_err(PlanError::Marshal)?;
    let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);
    let lines: Vec<String> = rendered.split('\n').map(str::to_owned).collect();
    match value {
        Value::String(s) if keeps_trailing_lines(&lines[0]) => Ok(vec![double_quoted(s)]),
        _ => Ok(lines),
    }
}

fn keeps_trailing_lines(header: &str) -> bool {
    header.starts_with(['|', '>']) && header.contains('+')
}

/// Writes `s` as a single-line double-quoted YAML scalar.
fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line>,
}

impl Renderer {
    fn push(&mut self, depth: usize, key: Option<String>, text: String) {
        self.lines.push(Line { depth, key, text });
    }

    fn continuation(&mut self, rest: Vec<String>, column: usize, depth: usize) {
        for part in rest {
            let text = if part.is_empty() {
                part
            } else {
                format!("{}{part}", " ".repeat(column))
            };
            self.push(depth, None, text);
        }
    }

    fn mapping(
        &mut self,
        map: &Mapping,
        column: usize,
        depth: usize,
        in_item: bool,
    ) -> Result<(), PlanError> {
        for (i, (k, v)) in map.iter().enumerate() {
            let mut rendered = scalar_lines(k)?;
            let rendered_key = match k {
                _ if rendered.len() == 1 => rendered.remove(0),
                Value::String(s) => double_quoted(s),
                _ => {
                    return Err(PlanError::desync(
                        self.lines.len() + 1,
                        "mapping key does not fit on one line",
                    ))
                }
            };
            let key = match k {
                Value::String(s) => s.clone(),
                _ => rendered_key.clone(),
            };
            let lead = if in_item && i == 0 {
                format!("{}- ", " ".repeat(column - INDENT))
            } else {
                " ".repeat(column)
            };
            self.entry(format!("{lead}{rendered_key}:"), key, v, column, depth)?;
        }
        Ok(())
    }

    fn entry(
        &mut self,
        head: String,
        key: String,
        value: &Value,
        column: usize,
        depth: usize,
    ) -> Result<(), PlanError> {
        match value {
            Value::Mapping(m) if !m.is_empty() => {
                self.push(depth, Some(key), head);
                self.mapping(m, column + INDENT, depth + 1, false)
            }
            Value::Sequence(s) if !s.is_empty() => {
                self.push(depth, Some(key), head);
                self.sequence(s, column, depth + 1)
            }
            scalar => {
                let mut parts = scalar_lines(scalar)?;
                let first = parts.remove(0);
                self.push(depth, Some(key), format!("{head} {first}"));
                self.continuation(parts, column, depth);
                Ok(())
            }
        }
    }

    // Items start at the column of the key that owns the sequence, the way
    // serde_yaml writes them. Keys inside items are one level below that key.
    fn sequence(&mut self, seq: &Sequence, column: usize, depth: usize) -> Result<(), PlanError> {
        let dash = " ".repeat(column);
        for item in seq {
            match item {
                Value::Mapping(m) if !m.is_empty() => {
                    self.mapping(m, column + INDENT, depth, true)?;
                }
                Value::Sequence(s) if !s.is_empty() => {
                    self.push(depth, None, format!("{dash}-"));
                    self.sequence(s, column + INDENT, depth)?;
                }
                scalar => {
                    let mut parts = scalar_lines(scalar)?;
                    let first = parts.remove(0);
                    self.push(depth, None, format!("{dash}- {first}"));
                    self.continuation(parts, column, depth);
                }
            }
        }
        Ok(())
    }
}

/// Walks a marshaled document into uncommented YAML lines, two columns per
/// nesting level.
pub fn render(value: &Value) -> Result<Vec<Line>, PlanError> {
    let mut renderer = Renderer::default();
    match value {
        Value::Mapping(m) if !m.is_empty() => renderer.mapping(m, 0, 0, false)?,
        scalar => {
            let parts = scalar_lines(scalar)?;
            renderer.continuation(parts, 0, 0);
        }
    }
    Ok(renderer.lines)
}

#[derive(Default)]
struct KeyStack {
    keys: Vec<String>,
}

impl KeyStack {
    fn push(&mut self, key: &str) {
        self.keys.push(key.to_owned());
    }

    fn pop(&mut self, line: usize) -> Result<String, PlanError> {
        self.keys
            .pop()
            .ok_or_else(|| PlanError::desync(line, "key stack underflow"))
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn path(&self) -> String {
        self.keys.join(".")
    }
}

fn leading_spaces(s: &str) -> usize {
    s.chars().take_while(|c| *c == ' ').count()
}

/// Writes `lines` out, placing the comment for each registered dotted path
/// above the first line with that path. Each comment block is preceded by one
/// blank line, and leaving a nested block also emits one blank line; the two
/// never stack.
pub fn annotate(lines: &[Line], mut registry: WorkingCopy) -> Result<String, PlanError> {
    let mut out = String::new();
    let mut stack = KeyStack::default();
    let mut prev_depth: Option<usize> = None;
    let mut blank_before_comment = true;
    let mut annotated = 0;

    for (n, line) in lines.iter().enumerate() {
        let line_no = n + 1;
        let Some(key) = &line.key else {
            out.push_str(&line.text);
            out.push('\n');
            blank_before_comment = true;
            continue;
        };

        let depth = line.depth;
        if let Some(prev) = prev_depth {
            if depth < prev {
                out.push('\n');
                blank_before_comment = false;
            }
            if depth <= prev {
                for _ in 0..=(prev - depth) {
                    stack.pop(line_no)?;
                }
            }
        }
        if stack.len() != depth {
            return Err(PlanError::desync(
                line_no,
                format!(
                    "key {key:?} at depth {depth} but {} keys are open",
                    stack.len()
                ),
            ));
        }
        stack.push(key);
        prev_depth = Some(depth);

        if let Some(comment) = registry.remove(stack.path().as_str()) {
            if blank_before_comment {
                out.push('\n');
            }
            let indent = " ".repeat(leading_spaces(&line.text));
            for c in comment {
                out.push_str(&format!("{indent}# {c}\n"));
            }
            annotated += 1;
        }
        out.push_str(&line.text);
        out.push('\n');
        blank_before_comment = true;
    }

    debug!("annotated {annotated} plan fields, {} comments unused", registry.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        comments::CommentLines,
        template::{build_plan, PlanTemplateOptions},
    };

    fn registry(entries: &[(&'static str, CommentLines)]) -> WorkingCopy {
        entries.iter().copied().collect()
    }

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn keyed(lines: &[Line]) -> Vec<(usize, &str)> {
        lines
            .iter()
            .filter_map(|l| l.key.as_deref().map(|k| (l.depth, k)))
            .collect()
    }

    #[test]
    fn render_tracks_depth_through_sequences() {
        let lines = render(&yaml(concat!(
            "nfs:\n  vols:\n  - host: a\n    path: b\n",
            "  - host: c\n    path: d\nname: x\n",
        )))
        .unwrap();
        assert_eq!(
            keyed(&lines),
            vec![
                (0, "nfs"),
                (1, "vols"),
                (2, "host"),
                (2, "path"),
                (2, "host"),
                (2, "path"),
                (0, "name"),
            ]
        );
        assert_eq!(lines[2].text, "  - host: a");
        assert_eq!(lines[3].text, "    path: b");
    }

    #[test]
    fn empty_collections_render_inline() {
        let lines = render(&yaml("a: []\nb: {}\n")).unwrap();
        assert_eq!(lines[0].text, "a: []");
        assert_eq!(lines[1].text, "b: {}");
    }

    #[test]
    fn comments_and_dedent_separators() {
        let registry = registry(&[("a.c.d", &["doc d"]), ("e", &["doc e"])]);
        let lines = render(&yaml("a:\n  b: 1\n  c:\n    d: x\ne: 2\n")).unwrap();
        assert_eq!(
            annotate(&lines, registry).unwrap(),
            "a:\n  b: 1\n  c:\n\n    # doc d\n    d: x\n\n# doc e\ne: 2\n"
        );
    }

    #[test]
    fn only_registered_full_path_is_annotated() {
        let registry = registry(&[("y.name", &["doc"])]);
        let lines = render(&yaml("x:\n  name: a\ny:\n  name: b\n")).unwrap();
        assert_eq!(
            annotate(&lines, registry).unwrap(),
            "x:\n  name: a\n\ny:\n\n  # doc\n  name: b\n"
        );
    }

    #[test]
    fn repeated_list_paths_are_annotated_once() {
        let registry = registry(&[("vols.host", &["doc"])]);
        let lines = render(&yaml("vols:\n- host: a\n  path: b\n- host: c\n  path: d\n")).unwrap();
        assert_eq!(
            annotate(&lines, registry).unwrap(),
            "vols:\n\n# doc\n- host: a\n  path: b\n- host: c\n  path: d\n"
        );
    }

    #[test]
    fn multi_line_scalars_do_not_move_the_stack() {
        let value = yaml("a: \"one\\ntwo: 2\\nthree\"\nb:\n  c: \"key: value\"\n");
        let registry = registry(&[("b.c", &["doc"])]);
        let lines = render(&value).unwrap();
        let out = annotate(&lines, registry).unwrap();

        assert!(out.contains("  # doc\n"));
        let back: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn depth_jump_is_a_defect() {
        let lines = vec![
            Line {
                depth: 0,
                key: Some("a".into()),
                text: "a:".into(),
            },
            Line {
                depth: 2,
                key: Some("b".into()),
                text: "    b: 1".into(),
            },
        ];
        let err = annotate(&lines, HashMap::new()).unwrap_err();
        assert!(err.is_defect());
    }

    #[test]
    fn key_without_open_parent_is_a_defect() {
        let lines = vec![Line {
            depth: 1,
            key: Some("a".into()),
            text: "  a: 1".into(),
        }];
        assert!(annotate(&lines, HashMap::new()).unwrap_err().is_defect());
    }

    #[test]
    fn plan_round_trips_through_text() {
        let mut plan = Plan::default();
        plan.cluster.name = "kubernetes".into();
        plan.cluster.admin_password = "abc".into();
        apply_defaults(&mut plan);

        let text = to_annotated_yaml(&plan).unwrap();
        assert_eq!(from_yaml(&text).unwrap(), plan);
    }

    fn template_plan() -> Plan {
        let options = PlanTemplateOptions {
            etcd_nodes: 1,
            admin_password: "Adm1nPasswordForTests".into(),
            ..Default::default()
        };
        build_plan(&options).unwrap()
    }

    #[test]
    fn trailing_blank_lines_survive_repeated_round_trips() {
        let mut plan = template_plan();
        plan.cluster.name = "a\n\n".into();

        let text = to_annotated_yaml(&plan).unwrap();
        assert!(text.contains("  name: \"a\\n\\n\"\n"));
        let back = from_yaml(&text).unwrap();
        assert_eq!(back, plan);
        assert_eq!(from_yaml(&to_annotated_yaml(&back).unwrap()).unwrap(), plan);
    }

    #[test]
    fn multi_line_map_keys_are_quoted() {
        let mut plan = template_plan();
        plan.etcd.nodes[0].labels.insert("x\ny".into(), "v".into());
        plan.etcd.nodes[0].labels.insert("tab\there".into(), "w".into());

        let text = to_annotated_yaml(&plan).unwrap();
        assert!(text.contains("\"x\\ny\": v\n"));
        assert_eq!(from_yaml(&text).unwrap(), plan);
    }

    #[test]
    fn double_quoting_escapes_control_characters() {
        assert_eq!(double_quoted("plain"), "\"plain\"");
        assert_eq!(double_quoted("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(double_quoted("\n\r\t\u{7}"), r#""\n\r\t\u0007""#);
        assert_eq!(
            serde_yaml::from_str::<String>(&double_quoted("x\n\n\u{1b}\"\\")).unwrap(),
            "x\n\n\u{1b}\"\\"
        );
    }

    #[test]
    fn unparseable_text_is_a_parse_error() {
        let err = from_yaml("cluster: [unterminated").unwrap_err();
        assert!(matches!(err, PlanError::Parse(_)));
    }
}
