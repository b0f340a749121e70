//! Loading card definition documents from strings, files and directories.

use std::fs;
use std::path::Path;

use log::debug;
use serde_json::Value;

use super::compiler::compile;
use super::schema::CardDefinition;
use super::validate::validate_definition;
use crate::cards::CardId;
use crate::core::EngineError;
use crate::engine::Registries;

/// Card definitions shipped with the crate.
const BUILTIN: &[(&str, &str)] = &[
    ("library.json", include_str!("../../data/cards/library.json")),
    ("exodia.json", include_str!("../../data/cards/exodia.json")),
    ("spells.json", include_str!("../../data/cards/spells.json")),
    ("monsters.json", include_str!("../../data/cards/monsters.json")),
];

/// Load every definition in a JSON document (one object or an array).
///
/// `origin` names the document in parse errors.
pub fn load_str(source: &str, origin: &str, registries: &mut Registries) -> Result<Vec<CardId>, EngineError> {
    let parse_error = |source| EngineError::Parse {
        origin: origin.to_string(),
        source,
    };

    let document: Value = serde_json::from_str(source).map_err(parse_error)?;
    let definitions = match document {
        Value::Array(items) => items,
        single => vec![single],
    };

    let mut loaded = Vec::with_capacity(definitions.len());
    for value in definitions {
        validate_definition(&value)?;
        let definition: CardDefinition = serde_json::from_value(value).map_err(parse_error)?;
        loaded.push(compile(&definition, registries)?);
    }

    debug!("loaded {} card(s) from {}", loaded.len(), origin);
    Ok(loaded)
}

/// Load a definition file.
pub fn load_file(path: &Path, registries: &mut Registries) -> Result<Vec<CardId>, EngineError> {
    let source = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&source, &path.display().to_string(), registries)
}

/// Load every `*.json` file in a directory, in file name order.
pub fn load_dir(dir: &Path, registries: &mut Registries) -> Result<Vec<CardId>, EngineError> {
    let io_error = |source| EngineError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loaded = Vec::new();
    for path in paths {
        loaded.extend(load_file(&path, registries)?);
    }
    Ok(loaded)
}

/// Load the definitions shipped with the crate.
pub fn load_builtin(registries: &mut Registries) -> Result<Vec<CardId>, EngineError> {
    let mut loaded = Vec::new();
    for (name, source) in BUILTIN {
        loaded.extend(load_str(source, name, registries)?);
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_array_document() {
        let mut registries = Registries::new().unwrap();
        let source = r#"[
            {"id": 1, "data": {"name": "A", "type": "monster", "frame-type": "normal", "level": 3}},
            {"id": 2, "data": {"name": "B", "type": "spell", "frame-type": "spell", "spell-type": "equip"}}
        ]"#;

        let loaded = load_str(source, "inline", &mut registries).unwrap();

        assert_eq!(loaded, vec![CardId::new(1), CardId::new(2)]);
        assert_eq!(registries.cards.len(), 2);
    }

    #[test]
    fn test_parse_error_names_origin() {
        let mut registries = Registries::new().unwrap();

        let err = load_str("{\"id\": ", "broken.json", &mut registries).unwrap_err();

        assert!(matches!(err, EngineError::Parse { ref origin, .. } if origin == "broken.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut registries = Registries::new().unwrap();

        let err = load_file(Path::new("does/not/exist.json"), &mut registries).unwrap_err();

        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn test_builtin_pool_loads() {
        let mut registries = Registries::new().unwrap();

        let loaded = load_builtin(&mut registries).unwrap();

        assert_eq!(loaded.len(), registries.cards.len());
        assert!(registries.cards.contains(CardId::new(70791313)));
        assert!(!registries.actions.ignitions(CardId::new(70791313)).is_empty());
    }
}
