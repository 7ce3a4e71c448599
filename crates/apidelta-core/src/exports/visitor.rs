//! Declaration visitor over a parsed Go source file.
//!
//! Walks only the top level of the syntax tree. Function bodies are never
//! entered, so the cost is proportional to the number of declarations.

use super::model::{is_exported, Const, Func, Interface, Param, Struct, TypeAlias};
use tree_sitter::Node;

/// One exported top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Const { name: String, value: Const },
    Type { name: String, kind: TypeDecl },
    Func { key: String, func: Func },
}

/// The three shapes a named type can take in the export model.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Alias(TypeAlias),
    Interface(Interface),
    Struct(Struct),
}

/// Read-only view of one file: its tree root plus the text spans resolve to.
pub struct FileVisitor<'a> {
    src: &'a str,
}

impl<'a> FileVisitor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src }
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        &self.src[node.byte_range()]
    }

    /// Type text with whitespace runs collapsed to single spaces.
    fn type_text(&self, node: Node<'_>) -> String {
        normalize_ws(self.text(node))
    }

    /// The name in the file's `package` clause, if any.
    pub fn package_name(&self, root: Node<'_>) -> Option<String> {
        let mut cursor = root.walk();
        let clause = root
            .children(&mut cursor)
            .find(|n| n.kind() == "package_clause")?;
        let mut inner = clause.walk();
        let name = clause
            .named_children(&mut inner)
            .find(|n| n.kind() == "package_identifier")
            .map(|n| self.text(n).to_string());
        name
    }

    /// Every exported top-level declaration in source order.
    pub fn declarations(&self, root: Node<'_>) -> Vec<Decl> {
        let mut decls = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "const_declaration" => self.visit_consts(child, &mut decls),
                "type_declaration" => self.visit_types(child, &mut decls),
                "function_declaration" => self.visit_function(child, None, &mut decls),
                "method_declaration" => {
                    let receiver = child
                        .child_by_field_name("receiver")
                        .and_then(|r| self.receiver_type(r));
                    if let Some(receiver) = receiver {
                        self.visit_function(child, Some(receiver), &mut decls);
                    }
                }
                _ => {}
            }
        }
        decls
    }

    // ---------------------------------------------------------------------
    // Constants
    // ---------------------------------------------------------------------

    fn visit_consts(&self, decl: Node<'_>, out: &mut Vec<Decl>) {
        // Implicit repetition: a spec with no value list reuses the previous one.
        let mut previous: Vec<Const> = Vec::new();
        let mut cursor = decl.walk();
        for spec in decl.named_children(&mut cursor) {
            if spec.kind() != "const_spec" {
                continue;
            }
            let mut names_cursor = spec.walk();
            let names: Vec<&str> = spec
                .children_by_field_name("name", &mut names_cursor)
                .map(|n| self.text(n))
                .collect();
            let declared_type = spec.child_by_field_name("type").map(|t| self.type_text(t));

            let current: Vec<Const> = match spec.child_by_field_name("value") {
                Some(values) => {
                    let mut values_cursor = values.walk();
                    values
                        .named_children(&mut values_cursor)
                        .filter(|n| n.kind() != "comment")
                        .map(|v| self.const_value(v, declared_type.as_deref()))
                        .collect()
                }
                None => previous.clone(),
            };

            for (i, name) in names.iter().enumerate() {
                if !is_exported(name) {
                    continue;
                }
                let value = current
                    .get(i)
                    .or_else(|| current.first())
                    .cloned()
                    .unwrap_or_default();
                out.push(Decl::Const {
                    name: name.to_string(),
                    value,
                });
            }
            if !current.is_empty() {
                previous = current;
            }
        }
    }

    fn const_value(&self, expr: Node<'_>, declared_type: Option<&str>) -> Const {
        let (inferred, value) = match expr.kind() {
            "interpreted_string_literal" | "raw_string_literal" => {
                ("string".to_string(), strip_quotes(self.text(expr)).to_string())
            }
            "int_literal" => ("int".to_string(), self.text(expr).to_string()),
            "float_literal" => ("float".to_string(), self.text(expr).to_string()),
            "imaginary_literal" => ("imag".to_string(), self.text(expr).to_string()),
            "rune_literal" => ("char".to_string(), self.text(expr).to_string()),
            "true" | "false" => ("bool".to_string(), self.text(expr).to_string()),
            "call_expression" => {
                // const FooConst = FooType("value")
                let ctor = expr
                    .child_by_field_name("function")
                    .map(|f| self.type_text(f))
                    .unwrap_or_default();
                let arg = expr.child_by_field_name("arguments").and_then(|args| {
                    let mut c = args.walk();
                    let first = args.named_children(&mut c).next();
                    first.map(|a| strip_quotes(self.text(a)).to_string())
                });
                (ctor, arg.unwrap_or_default())
            }
            "selector_expression" => ("qualified".to_string(), self.type_text(expr)),
            "binary_expression" => ("binary".to_string(), self.type_text(expr)),
            "identifier" if self.text(expr) == "iota" => ("int".to_string(), "iota".to_string()),
            "identifier" => ("ident".to_string(), self.text(expr).to_string()),
            _ => ("expr".to_string(), self.type_text(expr)),
        };
        Const {
            type_name: declared_type.map(str::to_string).unwrap_or(inferred),
            value,
        }
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    fn visit_types(&self, decl: Node<'_>, out: &mut Vec<Decl>) {
        let mut cursor = decl.walk();
        for spec in decl.named_children(&mut cursor) {
            if spec.kind() != "type_spec" && spec.kind() != "type_alias" {
                continue;
            }
            let Some(name) = spec.child_by_field_name("name").map(|n| self.text(n)) else {
                continue;
            };
            if !is_exported(name) {
                continue;
            }
            let Some(ty) = spec.child_by_field_name("type") else {
                continue;
            };
            let kind = match ty.kind() {
                "struct_type" => TypeDecl::Struct(self.struct_def(ty)),
                "interface_type" => TypeDecl::Interface(self.interface_def(ty)),
                _ => TypeDecl::Alias(TypeAlias {
                    underlying_type: self.type_text(ty),
                }),
            };
            out.push(Decl::Type {
                name: name.to_string(),
                kind,
            });
        }
    }

    fn struct_def(&self, ty: Node<'_>) -> Struct {
        let mut def = Struct::default();
        let mut cursor = ty.walk();
        let Some(list) = ty
            .named_children(&mut cursor)
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return def;
        };
        let mut list_cursor = list.walk();
        for field in list.named_children(&mut list_cursor) {
            if field.kind() != "field_declaration" {
                continue;
            }
            let Some(field_type) = field.child_by_field_name("type") else {
                continue;
            };
            let mut names_cursor = field.walk();
            let names: Vec<&str> = field
                .children_by_field_name("name", &mut names_cursor)
                .map(|n| self.text(n))
                .collect();
            if names.is_empty() {
                let pointer = field
                    .child(0)
                    .is_some_and(|first| first.kind() == "*");
                let embedded = self.type_text(field_type);
                def.anonymous_fields.push(if pointer {
                    format!("*{}", embedded)
                } else {
                    embedded
                });
                continue;
            }
            let type_text = self.type_text(field_type);
            for name in names.into_iter().filter(|n| is_exported(n)) {
                def.fields.insert(name.to_string(), type_text.clone());
            }
        }
        def
    }

    fn interface_def(&self, ty: Node<'_>) -> Interface {
        let mut def = Interface::default();
        self.collect_interface_elems(ty, &mut def);
        def
    }

    fn collect_interface_elems(&self, node: Node<'_>, def: &mut Interface) {
        let mut cursor = node.walk();
        for elem in node.named_children(&mut cursor) {
            match elem.kind() {
                "method_elem" | "method_spec" => {
                    let Some(name) = elem.child_by_field_name("name").map(|n| self.text(n)) else {
                        continue;
                    };
                    if is_exported(name) {
                        def.methods.insert(name.to_string(), self.signature(elem));
                    }
                }
                "method_spec_list" => self.collect_interface_elems(elem, def),
                "type_elem" | "constraint_elem" | "type_identifier" | "qualified_type" => {
                    def.anonymous_fields.push(self.type_text(elem));
                }
                _ => {}
            }
        }
    }

    // ---------------------------------------------------------------------
    // Functions
    // ---------------------------------------------------------------------

    fn visit_function(&self, decl: Node<'_>, receiver: Option<String>, out: &mut Vec<Decl>) {
        let Some(name) = decl.child_by_field_name("name").map(|n| self.text(n)) else {
            return;
        };
        if !is_exported(name) {
            return;
        }
        let key = match receiver {
            Some(r) => format!("{}.{}", r, name),
            None => name.to_string(),
        };
        out.push(Decl::Func {
            key,
            func: self.signature(decl),
        });
    }

    /// Parameters and results of a function, method or interface method.
    fn signature(&self, node: Node<'_>) -> Func {
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.params(p))
            .unwrap_or_default();
        let returns = node.child_by_field_name("result").and_then(|r| {
            if r.kind() == "parameter_list" {
                let types: Vec<String> = self.params(r).into_iter().map(|p| p.type_name).collect();
                (!types.is_empty()).then(|| types.join(", "))
            } else {
                Some(self.type_text(r))
            }
        });
        Func {
            params,
            returns,
            replaced_by: None,
        }
    }

    /// Expand a parameter list so each declared name gets its own entry.
    fn params(&self, list: Node<'_>) -> Vec<Param> {
        let mut params = Vec::new();
        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            let variadic = match decl.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let Some(ty) = decl.child_by_field_name("type") else {
                continue;
            };
            let mut type_text = self.type_text(ty);
            if variadic {
                type_text = format!("...{}", type_text);
            }
            let mut names_cursor = decl.walk();
            let names: Vec<&str> = decl
                .children_by_field_name("name", &mut names_cursor)
                .map(|n| self.text(n))
                .collect();
            if names.is_empty() {
                params.push(Param::new("", type_text));
            } else {
                params.extend(names.into_iter().map(|n| Param::new(n, type_text.clone())));
            }
        }
        params
    }

    /// Receiver type text with a leading `*` kept and type arguments dropped.
    fn receiver_type(&self, receiver: Node<'_>) -> Option<String> {
        let mut cursor = receiver.walk();
        let decl = receiver
            .named_children(&mut cursor)
            .find(|n| n.kind() == "parameter_declaration")?;
        let ty = self.type_text(decl.child_by_field_name("type")?);
        let base = match ty.find('[') {
            Some(i) => &ty[..i],
            None => ty.as_str(),
        };
        Some(base.trim().to_string())
    }
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove one pair of surrounding `"` or `` ` `` quotes.
fn strip_quotes(value: &str) -> &str {
    for q in ['"', '`'] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn decls(source: &str) -> Vec<Decl> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::language()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        FileVisitor::new(source).declarations(tree.root_node())
    }

    fn find_const<'d>(decls: &'d [Decl], wanted: &str) -> &'d Const {
        decls
            .iter()
            .find_map(|d| match d {
                Decl::Const { name, value } if name == wanted => Some(value),
                _ => None,
            })
            .unwrap_or_else(|| panic!("const {wanted} not found"))
    }

    #[test]
    fn test_package_name() {
        let source = "package armcompute\n";
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::language()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        assert_eq!(
            FileVisitor::new(source).package_name(tree.root_node()),
            Some("armcompute".to_string())
        );
    }

    #[test]
    fn test_const_types_and_quotes() {
        let d = decls(
            r#"package p
const (
    KindA Kind = "A"
    Untyped = 5
    Ratio = 1.5
    Made = Kind("made")
    Joined = "a" + "b"
    Raw = `raw text`
    Tick = 'x'
    hidden = "x"
)
"#,
        );
        assert_eq!(find_const(&d, "KindA"), &Const { type_name: "Kind".into(), value: "A".into() });
        assert_eq!(find_const(&d, "Untyped").type_name, "int");
        assert_eq!(find_const(&d, "Ratio").type_name, "float");
        assert_eq!(find_const(&d, "Made"), &Const { type_name: "Kind".into(), value: "made".into() });
        assert_eq!(find_const(&d, "Joined").type_name, "binary");
        assert_eq!(find_const(&d, "Joined").value, r#""a" + "b""#);
        assert_eq!(find_const(&d, "Raw").value, "raw text");
        assert_eq!(find_const(&d, "Tick").value, "'x'");
        assert!(!d.iter().any(|x| matches!(x, Decl::Const { name, .. } if name == "hidden")));
    }

    #[test]
    fn test_const_implicit_repetition() {
        let d = decls("package p\nconst (\n A Level = iota\n B\n C\n)\n");
        assert_eq!(find_const(&d, "C").type_name, "Level");
        assert_eq!(find_const(&d, "C").value, "iota");
    }

    #[test]
    fn test_type_classification() {
        let d = decls(
            r#"package p
type Kind string
type Tags map[string]*string
type Client struct {
    internal string
    Name, Title string
    *Base
    Props map[string]any `json:"props"`
}
type Poller interface {
    Done() bool
    Result(ctx context.Context) (Resp, error)
    fmt.Stringer
}
"#,
        );
        let by_name = |wanted: &str| {
            d.iter()
                .find_map(|x| match x {
                    Decl::Type { name, kind } if name == wanted => Some(kind.clone()),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(
            by_name("Kind"),
            TypeDecl::Alias(TypeAlias { underlying_type: "string".into() })
        );
        assert_eq!(
            by_name("Tags"),
            TypeDecl::Alias(TypeAlias { underlying_type: "map[string]*string".into() })
        );
        let TypeDecl::Struct(s) = by_name("Client") else { panic!("expected struct") };
        assert_eq!(s.anonymous_fields, vec!["*Base".to_string()]);
        assert_eq!(s.fields.get("Name").map(String::as_str), Some("string"));
        assert_eq!(s.fields.get("Title").map(String::as_str), Some("string"));
        assert_eq!(s.fields.get("Props").map(String::as_str), Some("map[string]any"));
        assert!(!s.fields.contains_key("internal"));

        let TypeDecl::Interface(i) = by_name("Poller") else { panic!("expected interface") };
        assert_eq!(i.anonymous_fields, vec!["fmt.Stringer".to_string()]);
        assert_eq!(i.methods["Done"].returns.as_deref(), Some("bool"));
        assert_eq!(i.methods["Result"].returns.as_deref(), Some("Resp, error"));
    }

    #[test]
    fn test_functions_and_methods() {
        let d = decls(
            r#"package p
func NewClient(subscriptionID string, credential azcore.TokenCredential, options *arm.ClientOptions) (*Client, error) {
    return nil, nil
}
func (client *Client) Get(ctx context.Context, a, b string, opts ...Option) (ClientGetResponse, error) {
    return ClientGetResponse{}, nil
}
func (r Resp) MarshalJSON() ([]byte, error) { return nil, nil }
func (client *Client) helper() {}
func unexported() {}
"#,
        );
        let funcs: Vec<(&str, &Func)> = d
            .iter()
            .filter_map(|x| match x {
                Decl::Func { key, func } => Some((key.as_str(), func)),
                _ => None,
            })
            .collect();
        let keys: Vec<&str> = funcs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["NewClient", "*Client.Get", "Resp.MarshalJSON"]);

        let get = funcs[1].1;
        assert_eq!(
            get.param_types(),
            "context.Context, string, string, ...Option"
        );
        assert_eq!(get.params[2].name, "b");
        assert_eq!(get.returns.as_deref(), Some("ClientGetResponse, error"));
        assert_eq!(funcs[0].1.returns.as_deref(), Some("*Client, error"));
    }

    #[test]
    fn test_generic_receiver_is_stripped() {
        let d = decls("package p\nfunc (p *Pager[T]) More() bool { return false }\n");
        assert!(matches!(&d[0], Decl::Func { key, .. } if key == "*Pager.More"));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"abc\""), "abc");
        assert_eq!(strip_quotes("`raw`"), "raw");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("42"), "42");
    }
}
