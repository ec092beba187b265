use crate::catalog::Catalog;
use crate::error::{ConfigError, TestFault};
use crate::introspect::{FieldDescriptor, TypeIntrospector};
use crate::result::TestResult;
use crate::test::{Test, TestMeta};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A predicate over field metadata.
#[derive(Clone)]
pub struct FieldPredicate(Arc<dyn Fn(&FieldDescriptor) -> bool + Send + Sync>);

impl FieldPredicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&FieldDescriptor) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Matches fields whose declared type is `name`, ignoring generic arguments.
    pub fn type_is(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |field| field.ty.is(&name))
    }

    /// Matches fields whose declared type is any of `names`.
    pub fn type_is_any(names: &[&str]) -> Self {
        let names: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
        Self::new(move |field| names.iter().any(|n| field.ty.is(n)))
    }

    /// Matches fields of a generic type whose arguments are exactly `args`.
    ///
    /// `generic(&["HashMap", "BTreeMap"], &["Sports", "Level"])` matches both
    /// `HashMap<Sports, Level>` and `BTreeMap<Sports, Level>`.
    pub fn generic(containers: &[&str], args: &[&str]) -> Self {
        let containers: Vec<String> = containers.iter().map(|n| (*n).to_string()).collect();
        let args: Vec<String> = args.iter().map(|n| (*n).to_string()).collect();
        Self::new(move |field| {
            containers.iter().any(|c| field.ty.is(c))
                && field.ty.args.len() == args.len()
                && field.ty.args.iter().zip(&args).all(|(a, expected)| a.is(expected))
        })
    }

    pub fn matches(&self, field: &FieldDescriptor) -> bool {
        (self.0)(field)
    }
}

impl fmt::Debug for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldPredicate")
    }
}

/// Errors and warnings found in a type's field layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureFindings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Checks the declared instance fields of a type against expected purposes.
///
/// A count mismatch or a misnamed field is a warning; a purpose no field
/// satisfies is an error. Several matching fields are tolerated.
#[derive(Debug, Clone)]
pub struct StructureCheck {
    meta: TestMeta,
    catalog: Arc<Catalog>,
    type_name: String,
    expected_fields: usize,
    purposes: Vec<(String, FieldPredicate)>,
}

impl StructureCheck {
    /// Creates a check named `{type}InternalStructureCheck`.
    pub fn new(
        catalog: Arc<Catalog>,
        type_name: impl Into<String>,
        expected_fields: usize,
    ) -> Result<Self, ConfigError> {
        let type_name = type_name.into();
        let meta = TestMeta::new(
            catalog.as_ref(),
            &[type_name.as_str()],
            format!("{}InternalStructureCheck", type_name),
            format!(
                "Checks whether the internal field structure of {} conforms to its expected layout",
                type_name
            ),
            [],
        )?;
        Ok(Self {
            meta,
            catalog,
            type_name,
            expected_fields,
            purposes: Vec::new(),
        })
    }

    /// Adds a field purpose; purposes are checked in the order added.
    pub fn purpose(mut self, label: impl Into<String>, predicate: FieldPredicate) -> Self {
        self.purposes.push((label.into(), predicate));
        self
    }

    /// Inspects the declared fields without building a result.
    pub fn findings(&self) -> StructureFindings {
        let fields: Vec<FieldDescriptor> = self
            .catalog
            .declared_fields(&self.type_name)
            .into_iter()
            .filter(|f| !f.is_static)
            .collect();

        let mut findings = StructureFindings::default();
        if fields.len() != self.expected_fields {
            findings.warnings.push(format!(
                "{} instance fields found (expected {})",
                fields.len(),
                self.expected_fields
            ));
        }

        for (label, predicate) in &self.purposes {
            let candidates: Vec<&FieldDescriptor> =
                fields.iter().filter(|f| predicate.matches(f)).collect();
            match candidates.as_slice() {
                [] => findings
                    .errors
                    .push(format!("No field for storing '{}' found", label)),
                [only] if only.name != *label => findings.warnings.push(format!(
                    "Field for storing '{}' is called '{}'",
                    label, only.name
                )),
                _ => {}
            }
        }
        findings
    }
}

impl Test for StructureCheck {
    fn meta(&self) -> &TestMeta {
        &self.meta
    }

    fn check(&self) -> Result<TestResult, TestFault> {
        let findings = self.findings();
        debug!(
            type_name = %self.type_name,
            errors = findings.errors.len(),
            warnings = findings.warnings.len(),
            "Checked internal structure"
        );

        let mut notes = String::new();
        if !findings.errors.is_empty() {
            notes.push_str("\nErrors found in internal structure:");
            for error in &findings.errors {
                notes.push_str("\n\t- ");
                notes.push_str(error);
            }
        }
        if !findings.warnings.is_empty() {
            notes.push_str("\nWarnings for internal structure:");
            for warning in &findings.warnings {
                notes.push_str("\n\t- ");
                notes.push_str(warning);
            }
        }

        Ok(TestResult::builder()
            .result(findings.errors.is_empty())
            .notes(notes)
            .tested_object(&format!("type {}", self.type_name))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::TypeInfo;
    use crate::shape::TypeExpr;

    fn catalog() -> Arc<Catalog> {
        Catalog::builder()
            .register_type(
                TypeInfo::new("Member")
                    .field("name", TypeExpr::simple("String"))
                    .field(
                        "sports",
                        TypeExpr::generic(
                            "HashMap",
                            vec![TypeExpr::simple("Sports"), TypeExpr::simple("Level")],
                        ),
                    )
                    .static_field("MAX_NAME", TypeExpr::simple("usize")),
            )
            .register_type(
                TypeInfo::new("Sloppy")
                    .field("label", TypeExpr::simple("String"))
                    .field("nickname", TypeExpr::simple("String"))
                    .field("count", TypeExpr::simple("u32")),
            )
            .build()
            .unwrap()
    }

    fn member_check(catalog: Arc<Catalog>) -> StructureCheck {
        StructureCheck::new(catalog, "Member", 2)
            .unwrap()
            .purpose("name", FieldPredicate::type_is("String"))
            .purpose(
                "sports",
                FieldPredicate::generic(&["HashMap", "BTreeMap"], &["Sports", "Level"]),
            )
    }

    #[test]
    fn test_conforming_structure_succeeds() {
        let check = member_check(catalog());
        assert_eq!(check.findings(), StructureFindings::default());

        let result = check.run();
        assert!(result.successful());
        assert!(result.notes().is_empty());
        assert_eq!(result.tested_objects(), ["type Member"]);
        assert_eq!(check.name(), "MemberInternalStructureCheck");
    }

    #[test]
    fn test_missing_purpose_is_error() {
        let check = StructureCheck::new(catalog(), "Member", 2)
            .unwrap()
            .purpose("fee", FieldPredicate::type_is("Decimal"));
        let result = check.run();
        assert!(!result.successful());
        assert!(result.notes().contains("\nErrors found in internal structure:\n\t- No field for storing 'fee' found"));
    }

    #[test]
    fn test_count_and_naming_are_warnings() {
        let check = StructureCheck::new(catalog(), "Sloppy", 2)
            .unwrap()
            .purpose("count", FieldPredicate::type_is_any(&["u32", "u64"]))
            .purpose("amount", FieldPredicate::type_is("u32"))
            .purpose("name", FieldPredicate::type_is("String"));

        let findings = check.findings();
        assert!(findings.errors.is_empty());
        assert_eq!(
            findings.warnings,
            vec![
                "3 instance fields found (expected 2)".to_string(),
                "Field for storing 'amount' is called 'count'".to_string(),
            ]
        );
        assert!(check.run().successful());
    }

    #[test]
    fn test_generic_predicate_checks_arguments() {
        let predicate = FieldPredicate::generic(&["HashMap"], &["Sports", "Level"]);
        let field = |ty: TypeExpr| FieldDescriptor {
            name: "sports".into(),
            ty,
            is_static: false,
            visibility: crate::introspect::Visibility::Private,
        };
        assert!(predicate.matches(&field(TypeExpr::parse("HashMap<Sports, Level>").unwrap())));
        assert!(!predicate.matches(&field(TypeExpr::parse("HashMap<Level, Sports>").unwrap())));
        assert!(!predicate.matches(&field(TypeExpr::parse("HashMap<Sports>").unwrap())));
        assert!(!predicate.matches(&field(TypeExpr::parse("Vec<Sports>").unwrap())));
    }

    #[test]
    fn test_unknown_type_is_config_error() {
        assert!(matches!(
            StructureCheck::new(catalog(), "Ghost", 0),
            Err(ConfigError::UnknownType(_))
        ));
    }
}
