use apidelta_core::exports::{Const, Content, Func, Param, Struct, TypeAlias};
use std::path::Path;
use tempfile::TempDir;

/// Write Go source files into a fresh temporary package directory
#[allow(dead_code)]
pub fn go_package(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in files {
        write_file(dir.path(), name, source);
    }
    dir
}

#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, source: &str) {
    std::fs::write(dir.join(name), source).unwrap();
}

/// Build a function signature from `(name, type)` pairs
#[allow(dead_code)]
pub fn func(params: &[(&str, &str)], returns: Option<&str>) -> Func {
    Func {
        params: params.iter().map(|(n, t)| Param::new(*n, *t)).collect(),
        returns: returns.map(str::to_string),
        replaced_by: None,
    }
}

#[allow(dead_code)]
pub fn string_enum(content: &mut Content, type_name: &str, values: &[&str]) {
    content.type_aliases.insert(
        type_name.to_string(),
        TypeAlias {
            underlying_type: "string".to_string(),
        },
    );
    for value in values {
        content.consts.insert(
            format!("{}{}", type_name, value),
            Const {
                type_name: type_name.to_string(),
                value: value.to_string(),
            },
        );
    }
}

#[allow(dead_code)]
pub fn struct_with(fields: &[(&str, &str)]) -> Struct {
    Struct {
        anonymous_fields: Vec::new(),
        fields: fields
            .iter()
            .map(|(n, t)| (n.to_string(), t.to_string()))
            .collect(),
    }
}
