//! Record layouts
//!
//! A [`RecordLayout`] is the ordered list of field declarations of one record
//! type. It is the input of specification generation. Layouts can be built in
//! code or loaded from JSON so that the metadata of a model can live in a
//! configuration file next to the data it is fitted to.

use crate::error::{FitParamsError, Result};
use crate::fields::bounds::Bounds;
use crate::fields::field::{FieldDecl, FieldKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The ordered field declarations of a record type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordLayout {
    fields: Vec<FieldDecl>,
}

/// On-disk form of a field declaration
#[derive(Debug, Serialize, Deserialize)]
struct RawFieldDecl {
    name: String,
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawLayout {
    fields: Vec<RawFieldDecl>,
}

impl TryFrom<RawFieldDecl> for FieldDecl {
    type Error = FitParamsError;

    fn try_from(raw: RawFieldDecl) -> Result<Self> {
        let RawFieldDecl {
            name,
            kind,
            min,
            max,
            value,
            target,
            default,
        } = raw;

        let kind = match kind.as_str() {
            "regular" => FieldKind::Regular,
            "bounded" => FieldKind::Bounded(Bounds::from_options(min, max)?),
            "const" => {
                let value = value.ok_or_else(|| FitParamsError::MissingValue {
                    name: name.clone(),
                })?;
                return Ok(FieldDecl::constant(&name, value));
            }
            "same_as" => {
                let target = target.ok_or_else(|| {
                    FitParamsError::Other(format!(
                        "Field '{}' of kind 'same_as' has no target",
                        name
                    ))
                })?;
                FieldKind::SameAs(target)
            }
            _ => return Err(FitParamsError::UnsupportedFieldKind { field: name, kind }),
        };

        Ok(FieldDecl {
            name,
            kind,
            default,
        })
    }
}

impl From<&FieldDecl> for RawFieldDecl {
    fn from(decl: &FieldDecl) -> Self {
        let mut raw = RawFieldDecl {
            name: decl.name.clone(),
            kind: decl.kind.tag().to_string(),
            min: None,
            max: None,
            value: None,
            target: None,
            default: decl.default,
        };
        match &decl.kind {
            FieldKind::Regular => {}
            FieldKind::Bounded(bounds) => {
                raw.min = bounds.min_option();
                raw.max = bounds.max_option();
            }
            FieldKind::Const(value) => {
                raw.value = Some(*value);
                raw.default = None;
            }
            FieldKind::SameAs(target) => raw.target = Some(target.clone()),
        }
        raw
    }
}

impl RecordLayout {
    /// Create a layout from declarations in declaration order
    ///
    /// # Returns
    ///
    /// The layout, or [`FitParamsError::DuplicateField`] if a name is declared twice
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::{FieldDecl, RecordLayout};
    ///
    /// let layout = RecordLayout::new(vec![
    ///     FieldDecl::regular("a"),
    ///     FieldDecl::same_as("b", "a"),
    ///     FieldDecl::constant("c", 7.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(layout.len(), 3);
    /// assert_eq!(layout.names(), vec!["a", "b", "c"]);
    /// ```
    pub fn new(fields: Vec<FieldDecl>) -> Result<Self> {
        let mut seen = HashSet::new();
        for decl in &fields {
            if !seen.insert(decl.name.as_str()) {
                return Err(FitParamsError::DuplicateField {
                    name: decl.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Append a declaration
    pub fn push(&mut self, decl: FieldDecl) -> Result<()> {
        if self.contains(&decl.name) {
            return Err(FitParamsError::DuplicateField { name: decl.name });
        }
        self.fields.push(decl);
        Ok(())
    }

    /// Builder-style [`RecordLayout::push`]
    pub fn with_field(mut self, decl: FieldDecl) -> Result<Self> {
        self.push(decl)?;
        Ok(self)
    }

    /// The declarations in declaration order
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// The field names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.iter()
    }

    /// Load a layout from a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::{FieldKind, RecordLayout};
    ///
    /// let json = r#"{
    ///   "fields": [
    ///     { "name": "amplitude", "kind": "bounded", "min": 0.0 },
    ///     { "name": "offset", "kind": "const", "value": 1.0 },
    ///     { "name": "width", "kind": "regular", "default": 2.0 },
    ///     { "name": "height", "kind": "same_as", "target": "width" }
    ///   ]
    /// }"#;
    ///
    /// let layout = RecordLayout::from_json(json).unwrap();
    /// assert_eq!(layout.len(), 4);
    /// assert_eq!(layout.get("offset").unwrap().kind, FieldKind::Const(1.0));
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawLayout = serde_json::from_str(json)?;
        let fields = raw
            .fields
            .into_iter()
            .map(FieldDecl::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(fields)
    }

    /// Save the layout to a JSON string
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(&self.to_raw())?;
        Ok(json)
    }

    /// Load a layout from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Save the layout to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &self.to_raw())?;
        Ok(())
    }

    fn to_raw(&self) -> RawLayout {
        RawLayout {
            fields: self.fields.iter().map(RawFieldDecl::from).collect(),
        }
    }
}
