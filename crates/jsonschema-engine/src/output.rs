//! Output formats of the evaluation result.
//!
//! The `flag` format only tells whether the instance is valid. The `list` format is a flat
//! sequence of output units, one per evaluated schema object, carrying its errors and
//! annotations.
use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::Serialize;
use serde_json::Value;

use crate::{
    context::{Annotation, ExecutionConfig},
    paths::{Location, SchemaLocation},
    validator::Evaluation,
    Validator,
};

/// The result of applying a schema to an instance, renderable in one of the output formats.
#[derive(Debug, Clone)]
pub struct Output<'a, 'b> {
    validator: &'a Validator,
    instance: &'b Value,
}

impl<'a, 'b> Output<'a, 'b> {
    pub(crate) const fn new(validator: &'a Validator, instance: &'b Value) -> Output<'a, 'b> {
        Output {
            validator,
            instance,
        }
    }
    /// The "flag" output format.
    #[must_use]
    pub fn flag(&self) -> FlagOutput {
        FlagOutput {
            valid: self.validator.is_valid(self.instance),
        }
    }
    /// The "list" output format.
    ///
    /// Errors and annotations are grouped into units by the schema object that produced them
    /// and the instance location they apply to.
    ///
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::validator_for(&json!({"minimum": 5}))?;
    /// let output = validator.apply(&json!(3)).list();
    /// assert_eq!(
    ///     serde_json::to_value(output)?,
    ///     json!({
    ///         "valid": false,
    ///         "details": [{
    ///             "valid": false,
    ///             "evaluationPath": "",
    ///             "schemaLocation": "json-schema:///#",
    ///             "instanceLocation": "",
    ///             "errors": {"minimum": "must have a minimum value of 5"}
    ///         }]
    ///     })
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn list(&self) -> ListOutput {
        let config = ExecutionConfig::new().with_annotation_collection(true);
        let evaluation = self.validator.evaluate_with(self.instance, &config);
        ListOutput::from_evaluation(&evaluation)
    }
}

/// Whether the instance is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagOutput {
    valid: bool,
}

impl FlagOutput {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }
}

/// A flat list of output units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListOutput {
    valid: bool,
    details: Vec<OutputUnit>,
}

type UnitKey = (Location, SchemaLocation, Location);

impl ListOutput {
    fn from_evaluation(evaluation: &Evaluation<'_>) -> ListOutput {
        let mut builder = UnitsBuilder::default();
        for error in evaluation.errors() {
            let unit = builder.unit(
                &error.evaluation_path,
                &error.schema_location,
                &error.instance_location,
            );
            unit.valid = false;
            let errors = unit.errors.get_or_insert_with(BTreeMap::new);
            let message = error.to_string();
            errors
                .entry(error.keyword.to_string())
                .and_modify(|existing| {
                    existing.push_str("; ");
                    existing.push_str(&message);
                })
                .or_insert(message);
        }
        for annotation in evaluation.annotations() {
            builder
                .annotation_unit(annotation)
                .annotations
                .get_or_insert_with(BTreeMap::new)
                .insert(annotation.keyword().to_string(), annotation.value().clone());
        }
        for annotation in evaluation.dropped_annotations() {
            let unit = builder.annotation_unit(annotation);
            unit.valid = false;
            unit.dropped_annotations
                .get_or_insert_with(BTreeMap::new)
                .insert(annotation.keyword().to_string(), annotation.value().clone());
        }
        ListOutput {
            valid: evaluation.is_valid(),
            details: builder.units,
        }
    }
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }
    #[must_use]
    pub fn details(&self) -> &[OutputUnit] {
        &self.details
    }
}

#[derive(Default)]
struct UnitsBuilder {
    units: Vec<OutputUnit>,
    index: AHashMap<UnitKey, usize>,
}

impl UnitsBuilder {
    fn annotation_unit(&mut self, annotation: &Annotation) -> &mut OutputUnit {
        self.unit(
            annotation.evaluation_path(),
            annotation.schema_location(),
            annotation.instance_location(),
        )
    }

    /// The unit of the schema object containing the keyword at the given locations.
    fn unit(
        &mut self,
        evaluation_path: &Location,
        schema_location: &SchemaLocation,
        instance_location: &Location,
    ) -> &mut OutputUnit {
        let key = (
            evaluation_path.parent().unwrap_or_default(),
            schema_location.parent(),
            instance_location.clone(),
        );
        let units = &mut self.units;
        let idx = *self.index.entry(key).or_insert_with_key(|key| {
            units.push(OutputUnit {
                valid: true,
                evaluation_path: key.0.clone(),
                schema_location: key.1.clone(),
                instance_location: key.2.clone(),
                errors: None,
                annotations: None,
                dropped_annotations: None,
            });
            units.len() - 1
        });
        &mut self.units[idx]
    }
}

/// Errors and annotations of one schema object applied at one instance location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputUnit {
    valid: bool,
    evaluation_path: Location,
    schema_location: SchemaLocation,
    instance_location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<BTreeMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dropped_annotations: Option<BTreeMap<String, Value>>,
}

impl OutputUnit {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }
    #[must_use]
    pub fn evaluation_path(&self) -> &Location {
        &self.evaluation_path
    }
    #[must_use]
    pub fn schema_location(&self) -> &SchemaLocation {
        &self.schema_location
    }
    #[must_use]
    pub fn instance_location(&self) -> &Location {
        &self.instance_location
    }
    /// Error messages by keyword.
    #[must_use]
    pub fn errors(&self) -> Option<&BTreeMap<String, String>> {
        self.errors.as_ref()
    }
    #[must_use]
    pub fn annotations(&self) -> Option<&BTreeMap<String, Value>> {
        self.annotations.as_ref()
    }
    #[must_use]
    pub fn dropped_annotations(&self) -> Option<&BTreeMap<String, Value>> {
        self.dropped_annotations.as_ref()
    }
}
