//! Template store: prompt wording loaded from a TOML data file.
//!
//! The built-in set is compiled in from `templates/prompts.toml`; `TEMPLATES_PATH`
//! points at a replacement file with the same layout. Every file is validated in
//! full at load time, so a store that loads can serve every (domain, role) the
//! pipelines ask for.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::llm_client::CompletionParams;
use crate::requirements::domain::Domain;
use crate::requirements::pipeline::PipelineKind;
use crate::requirements::role::Role;

/// The built-in template file.
pub const DEFAULT_TEMPLATES: &str = include_str!("../../templates/prompts.toml");

pub const REQUIREMENT: &str = "requirement";
pub const TECH_SPEC: &str = "tech_spec";
pub const USER_STORIES: &str = "user_stories";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid template file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown key '{key}' in [{section}]")]
    UnknownKey { section: String, key: String },

    #[error("Missing template [{section}].{role}")]
    MissingTemplate { section: String, role: Role },

    #[error("Missing completion params [stages.{0}]")]
    MissingStage(Role),

    #[error("Template '{template}' must use placeholders {expected:?}, found {found:?}")]
    PlaceholderMismatch {
        template: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("No value supplied for placeholder '{{{0}}}'")]
    MissingValue(String),

    #[error("Template has no placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// An immutable prompt template with `{name}` slots, plus the params its stage runs with.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
    params: CompletionParams,
}

impl Template {
    fn parse(name: String, text: &str, params: CompletionParams) -> Self {
        Self {
            name,
            segments: parse_segments(text),
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> CompletionParams {
        self.params
    }

    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Fills every slot in a single pass. Substituted values are never re-scanned,
    /// so user text containing `{tech_spec}` lands in the prompt verbatim.
    ///
    /// Supplying too few or too many values is a programming error and fails fast.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        let placeholders = self.placeholders();

        for placeholder in &placeholders {
            if !values.iter().any(|(key, _)| key == placeholder) {
                return Err(TemplateError::MissingValue(placeholder.to_string()));
            }
        }
        for (key, _) in values {
            if !placeholders.contains(key) {
                return Err(TemplateError::UnknownPlaceholder(key.to_string()));
            }
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name) => {
                    if let Some((_, value)) = values.iter().find(|(k, _)| k == name) {
                        out.push_str(value);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Splits template text into literals and `{snake_case}` slots.
/// Braces that do not enclose a snake_case name stay literal.
fn parse_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_lowercase() || c == '_'))
            .unwrap_or(after.len());

        if name_len > 0 && after[name_len..].starts_with('}') {
            literal.push_str(&rest[..open]);
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Slot(after[..name_len].to_string()));
            rest = &after[name_len + 1..];
        } else {
            literal.push_str(&rest[..=open]);
            rest = after;
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// On-disk layout of a template file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    stages: BTreeMap<String, CompletionParams>,
    specification: BTreeMap<String, BTreeMap<String, String>>,
    stories: BTreeMap<String, String>,
    validators: BTreeMap<String, String>,
}

/// Immutable lookup from (domain, role) or role to a validated template.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    specification: HashMap<(Domain, Role), Template>,
    stories: HashMap<Role, Template>,
    validators: HashMap<Role, Template>,
}

impl TemplateStore {
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::from_toml_str(DEFAULT_TEMPLATES)
    }

    pub fn from_path(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, TemplateError> {
        let file: TemplateFile = toml::from_str(text)?;

        let mut stages = HashMap::new();
        for (key, params) in file.stages {
            let role = parse_key::<Role>("stages", &key)?;
            stages.insert(role, params);
        }

        let mut specification = HashMap::new();
        for (domain_key, roles) in file.specification {
            let domain = parse_key::<Domain>("specification", &domain_key)?;
            let section = format!("specification.{domain}");
            let templates =
                build_section(PipelineKind::Specification, &section, roles, &stages)?;
            for (role, template) in templates {
                specification.insert((domain, role), template);
            }
        }
        for domain in Domain::ALL {
            for role in PipelineKind::Specification.roles() {
                if !specification.contains_key(&(domain, *role)) {
                    return Err(TemplateError::MissingTemplate {
                        section: format!("specification.{domain}"),
                        role: *role,
                    });
                }
            }
        }

        let stories = build_section(PipelineKind::Stories, "stories", file.stories, &stages)?;
        let validators =
            build_section(PipelineKind::Validation, "validators", file.validators, &stages)?;

        Ok(Self {
            specification,
            stories,
            validators,
        })
    }

    pub fn specification(&self, domain: Domain, role: Role) -> Result<&Template, TemplateError> {
        self.specification
            .get(&(domain, role))
            .ok_or_else(|| TemplateError::MissingTemplate {
                section: format!("specification.{domain}"),
                role,
            })
    }

    pub fn story(&self, role: Role) -> Result<&Template, TemplateError> {
        self.stories
            .get(&role)
            .ok_or_else(|| TemplateError::MissingTemplate {
                section: "stories".to_string(),
                role,
            })
    }

    pub fn validator(&self, role: Role) -> Result<&Template, TemplateError> {
        self.validators
            .get(&role)
            .ok_or_else(|| TemplateError::MissingTemplate {
                section: "validators".to_string(),
                role,
            })
    }
}

fn parse_key<T: std::str::FromStr>(section: &str, key: &str) -> Result<T, TemplateError> {
    key.parse().map_err(|_| TemplateError::UnknownKey {
        section: section.to_string(),
        key: key.to_string(),
    })
}

/// Builds one role-keyed section, checking that it holds exactly the pipeline's
/// roles and that each template uses exactly the pipeline's placeholders.
fn build_section(
    kind: PipelineKind,
    section: &str,
    raw: BTreeMap<String, String>,
    stages: &HashMap<Role, CompletionParams>,
) -> Result<HashMap<Role, Template>, TemplateError> {
    let mut templates = HashMap::new();

    for (key, text) in raw {
        let role = parse_key::<Role>(section, &key)?;
        if !kind.roles().contains(&role) {
            return Err(TemplateError::UnknownKey {
                section: section.to_string(),
                key,
            });
        }
        let params = *stages.get(&role).ok_or(TemplateError::MissingStage(role))?;
        let template = Template::parse(format!("{section}.{role}"), &text, params);

        let expected: BTreeSet<&str> = kind.placeholders().iter().copied().collect();
        if template.placeholders() != expected {
            return Err(TemplateError::PlaceholderMismatch {
                template: template.name().to_string(),
                expected: expected.iter().map(|s| s.to_string()).collect(),
                found: template.placeholders().iter().map(|s| s.to_string()).collect(),
            });
        }

        templates.insert(role, template);
    }

    if let Some(role) = kind.roles().iter().find(|r| !templates.contains_key(r)) {
        return Err(TemplateError::MissingTemplate {
            section: section.to_string(),
            role: *role,
        });
    }

    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PARAMS: CompletionParams = CompletionParams {
        max_tokens: 100,
        temperature: 0.3,
    };

    fn minimal_file() -> String {
        let mut text = String::new();
        for role in Role::ALL {
            text.push_str(&format!(
                "[stages.{role}]\nmax_tokens = 100\ntemperature = 0.3\n\n"
            ));
        }
        for domain in Domain::ALL {
            text.push_str(&format!(
                "[specification.{domain}]\nanalyst = \"{domain} analyst: {{requirement}}\"\narchitect = \"{domain} architect: {{requirement}}\"\n\n"
            ));
        }
        text.push_str(
            "[stories]\nproduct_owner = \"po: {requirement}\"\nux_designer = \"ux: {requirement}\"\n\n",
        );
        text.push_str(
            "[validators]\n\
             qa_lead = \"qa: {tech_spec} / {user_stories}\"\n\
             business_analyst = \"ba: {tech_spec} / {user_stories}\"\n\
             security_expert = \"sec: {tech_spec} / {user_stories}\"\n",
        );
        text
    }

    #[test]
    fn test_builtin_templates_load() {
        let store = TemplateStore::builtin().unwrap();

        let analyst = store.specification(Domain::Healthcare, Role::Analyst).unwrap();
        assert_eq!(analyst.params().max_tokens, 1200);
        assert!(analyst.placeholders().contains(REQUIREMENT));

        let ux = store.story(Role::UxDesigner).unwrap();
        assert_eq!(ux.params().max_tokens, 800);

        let qa = store.validator(Role::QaLead).unwrap();
        assert_eq!(qa.params().temperature, 0.2);
        assert_eq!(
            qa.placeholders(),
            BTreeSet::from([TECH_SPEC, USER_STORIES])
        );
    }

    #[test]
    fn test_builtin_domains_have_distinct_wording() {
        let store = TemplateStore::builtin().unwrap();
        let rendered: BTreeSet<String> = Domain::ALL
            .iter()
            .map(|d| {
                store
                    .specification(*d, Role::Architect)
                    .unwrap()
                    .render(&[(REQUIREMENT, "x")])
                    .unwrap()
            })
            .collect();
        assert_eq!(rendered.len(), Domain::ALL.len());
    }

    #[test]
    fn test_render_substitutes_requirement() {
        let t = Template::parse("t".into(), "Business Requirement: {requirement}\nGo.", PARAMS);
        let out = t.render(&[(REQUIREMENT, "Sell socks")]).unwrap();
        assert_eq!(out, "Business Requirement: Sell socks\nGo.");
    }

    #[test]
    fn test_render_does_not_rescan_substituted_text() {
        let t = Template::parse("t".into(), "A={tech_spec} B={user_stories}", PARAMS);
        let out = t
            .render(&[(TECH_SPEC, "{user_stories}"), (USER_STORIES, "stories")])
            .unwrap();
        assert_eq!(out, "A={user_stories} B=stories");
    }

    #[test]
    fn test_render_missing_value_fails_fast() {
        let t = Template::parse("t".into(), "{tech_spec} {user_stories}", PARAMS);
        let err = t.render(&[(TECH_SPEC, "spec")]).unwrap_err();
        assert!(matches!(err, TemplateError::MissingValue(p) if p == USER_STORIES));
    }

    #[test]
    fn test_render_unknown_value_fails_fast() {
        let t = Template::parse("t".into(), "{requirement}", PARAMS);
        let err = t
            .render(&[(REQUIREMENT, "r"), (TECH_SPEC, "s")])
            .unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder(p) if p == TECH_SPEC));
    }

    #[test]
    fn test_non_placeholder_braces_stay_literal() {
        let t = Template::parse("t".into(), "json {\"a\": 1} {} {Upper} {requirement}", PARAMS);
        assert_eq!(t.placeholders(), BTreeSet::from([REQUIREMENT]));
        let out = t.render(&[(REQUIREMENT, "r")]).unwrap();
        assert_eq!(out, "json {\"a\": 1} {} {Upper} r");
    }

    #[test]
    fn test_minimal_file_loads() {
        let store = TemplateStore::from_toml_str(&minimal_file()).unwrap();
        let out = store
            .specification(Domain::Fintech, Role::Analyst)
            .unwrap()
            .render(&[(REQUIREMENT, "r")])
            .unwrap();
        assert_eq!(out, "fintech analyst: r");
    }

    #[test]
    fn test_missing_domain_is_rejected() {
        let text = minimal_file().replace("[specification.general]", "[specification.ignored]");
        let err = TemplateStore::from_toml_str(&text).unwrap_err();
        assert!(
            matches!(err, TemplateError::UnknownKey { ref key, .. } if key == "ignored"),
            "got {err}"
        );

        let text = minimal_file().replace(
            "[specification.general]\nanalyst = \"general analyst: {requirement}\"\narchitect = \"general architect: {requirement}\"\n",
            "",
        );
        let err = TemplateStore::from_toml_str(&text).unwrap_err();
        assert!(
            matches!(
                err,
                TemplateError::MissingTemplate { ref section, role: Role::Analyst } if section == "specification.general"
            ),
            "got {err}"
        );
    }

    #[test]
    fn test_missing_validator_is_rejected() {
        let text = minimal_file().replace("security_expert = \"sec: {tech_spec} / {user_stories}\"\n", "");
        let err = TemplateStore::from_toml_str(&text).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MissingTemplate {
                role: Role::SecurityExpert,
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_placeholder_is_rejected() {
        let text = minimal_file().replace("po: {requirement}", "po: {tech_spec}");
        let err = TemplateStore::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, TemplateError::PlaceholderMismatch { .. }));
    }

    #[test]
    fn test_role_in_wrong_section_is_rejected() {
        let text = minimal_file().replace("[stories]\n", "[stories]\nqa_lead = \"x {requirement}\"\n");
        let err = TemplateStore::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownKey { ref key, .. } if key == "qa_lead"));
    }

    #[test]
    fn test_missing_stage_params_is_rejected() {
        let text = minimal_file().replace(
            "[stages.ux_designer]\nmax_tokens = 100\ntemperature = 0.3\n",
            "",
        );
        let err = TemplateStore::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, TemplateError::MissingStage(Role::UxDesigner)));
    }

    #[test]
    fn test_unknown_stage_key_is_rejected() {
        let text = minimal_file().replace(
            "[stages.analyst]\n",
            "[stages.analyst]\nmax_token = 5\n",
        );
        let err = TemplateStore::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, TemplateError::Parse(_)), "got {err}");
        assert!(err.to_string().contains("max_token"), "got {err}");
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(minimal_file().as_bytes()).unwrap();

        let store = TemplateStore::from_path(file.path()).unwrap();
        assert!(store.validator(Role::BusinessAnalyst).is_ok());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = TemplateStore::from_path(Path::new("/nonexistent/prompts.toml")).unwrap_err();
        assert!(matches!(err, TemplateError::Io { .. }));
    }
}
