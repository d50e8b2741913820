use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::artifact;
use crate::database::{BuildInfo, Database};
use crate::model::{
    is_category, is_permission, ApiVersionTable, DependencyTarget, License, PluginDependency,
    PluginRequirement, ReleaseCandidate, ReleaseFlags, ReleaseStage, Spoon, MAX_KEYWORD_COUNT,
    MAX_SHORT_DESC_LENGTH, MAX_VERSION_LENGTH, SELF_RELEASE_MARKER,
};
use crate::resource::{ResourceStore, NULL_RESOURCE};
use crate::source_control::{RepoInfo, SourceControl};

use super::article::ArticleTarget;
use super::icon::check_icon;
use super::{DependencyInput, SpoonInput, SubmitError, Submission};

/// A candidate together with the non-fatal notes raised while building it
#[derive(Debug, Clone)]
pub struct Validated {
    pub candidate: ReleaseCandidate,
    pub warnings: Vec<String>,
}

static PLUGIN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{2,}$").unwrap());

/// Turns one submission into a [`ReleaseCandidate`], checking fields in a
/// fixed order and stopping at the first rejection.
pub(crate) struct Validator<'a> {
    pub db: &'a Database,
    pub store: &'a ResourceStore,
    pub scm: &'a dyn SourceControl,
    pub apis: &'a ApiVersionTable,
    pub token: &'a str,
}

impl Validator<'_> {
    pub async fn validate(&self, doc: &Submission) -> Result<Validated, SubmitError> {
        let mut warnings = Vec::new();

        let build = self.build(doc).await?;
        let repo = self.repository(&build).await?;
        let icon_url = self.icon(doc, &build, &repo).await?;

        let previous_versions = self.db.get_project_versions(build.project_id).await?;
        let is_update = !previous_versions.is_empty();

        let name = self.name(doc, &mut warnings).await?;
        let short_desc = short_desc(doc)?;
        let version = version(doc, &previous_versions)?;

        let articles = ArticleTarget {
            store: self.store,
            scm: self.scm,
            token: self.token,
            context: &repo.full_name,
        };
        let description = doc
            .desc
            .as_ref()
            .ok_or_else(|| SubmitError::invalid("Param 'desc' missing or incorrect"))?;
        let description_resource_id = articles.store(description, "description").await?;

        let change_log_resource_id = if is_update {
            let change_log = doc
                .change_log
                .as_ref()
                .ok_or_else(|| SubmitError::invalid("Param 'changeLog' missing or incorrect"))?;
            articles.store(change_log, "changelog").await?
        } else {
            NULL_RESOURCE
        };

        let license = self.license(doc, &articles).await?;
        let flags = ReleaseFlags {
            pre_release: doc.pre_release,
            ..ReleaseFlags::default()
        };
        let categories = categories(doc)?;
        let keywords = keywords(doc)?;
        let spoons = spoons(doc, self.apis)?;
        let dependencies = self.dependencies(doc).await?;
        let permissions = permissions(doc)?;
        let requirements = requirements(doc)?;
        let stage = ReleaseStage::for_submission(doc.as_draft);

        // last, so a rejected submission never leaves a repackaged artifact behind
        let artifact_resource_id = artifact::repackage(self.store, build.resource_id, &version).await?;

        let candidate = ReleaseCandidate {
            name,
            short_desc,
            version,
            project_id: build.project_id,
            build_id: build.build_id,
            artifact_resource_id,
            description_resource_id,
            change_log_resource_id,
            license,
            icon_url,
            categories,
            keywords,
            spoons,
            dependencies,
            permissions,
            requirements,
            flags,
            stage,
            creation: chrono::Utc::now().timestamp(),
        };
        Ok(Validated {
            candidate,
            warnings,
        })
    }

    async fn build(&self, doc: &Submission) -> Result<BuildInfo, SubmitError> {
        let build_id = doc
            .build_id
            .ok_or_else(|| SubmitError::invalid("Param 'buildId' missing"))?;
        self.db
            .get_build_info(build_id)
            .await?
            .ok_or_else(|| SubmitError::invalid("Param 'buildId' does not represent a valid build"))
    }

    async fn repository(&self, build: &BuildInfo) -> Result<RepoInfo, SubmitError> {
        let repo = self
            .scm
            .repository(build.repo_id, self.token)
            .await
            .map_err(SubmitError::from_permission_check)?;
        if !repo.admin {
            return Err(SubmitError::Authorization(
                "Admin access required for releasing plugins".into(),
            ));
        }
        Ok(repo)
    }

    async fn icon(
        &self,
        doc: &Submission,
        build: &BuildInfo,
        repo: &RepoInfo,
    ) -> Result<Option<String>, SubmitError> {
        let Some(icon_name) = doc.icon_name.as_deref().filter(|n| !n.is_empty()) else {
            return Ok(None);
        };

        let path = format!("{}{}", build.path, icon_name);
        let file = match self
            .scm
            .file_at(&repo.full_name, &path, &build.sha, self.token)
            .await
        {
            Ok(file) => file,
            Err(e) if e.is_not_found() => {
                return Err(SubmitError::invalid(format!(
                    "Image cannot be found from {path}"
                )))
            }
            Err(e) => return Err(SubmitError::Upstream(e)),
        };

        check_icon(&path, &file.content)?;
        Ok(file.download_url)
    }

    async fn name(
        &self,
        doc: &Submission,
        warnings: &mut Vec<String>,
    ) -> Result<String, SubmitError> {
        let name = doc
            .name
            .as_deref()
            .ok_or_else(|| SubmitError::invalid("Param 'name' missing"))?;
        if !PLUGIN_NAME.is_match(name) {
            return Err(SubmitError::invalid(
                "Invalid plugin name: Plugin name must be at least two characters long, \
                 consisting of A-Z, a-z, 0-9 or _ only",
            ));
        }

        let similar = self.db.count_checked_name_prefix(name).await?;
        if similar > 0 {
            tracing::warn!(name, similar, "plugin name collides with checked releases");
            warnings.push(format!(
                "There are {similar} other checked plugins with names starting with '{name}'"
            ));
        }
        Ok(name.to_string())
    }

    async fn license(
        &self,
        doc: &Submission,
        articles: &ArticleTarget<'_>,
    ) -> Result<License, SubmitError> {
        let kind = doc
            .license
            .as_ref()
            .and_then(|l| l.kind.as_deref())
            .ok_or_else(|| SubmitError::invalid("Param 'license' missing or incorrect"))?
            .to_lowercase();

        match kind.as_str() {
            "none" => Ok(License::None),
            "custom" => {
                let text = doc
                    .license
                    .as_ref()
                    .and_then(|l| l.val.as_ref())
                    .ok_or_else(|| SubmitError::invalid("Param 'license' missing custom value"))?;
                let resource_id = articles.store(text, "custom license").await?;
                Ok(License::Custom { resource_id })
            }
            _ => {
                let known = self
                    .scm
                    .license_keys(self.token)
                    .await
                    .map_err(SubmitError::Upstream)?;
                if known.iter().any(|k| k.eq_ignore_ascii_case(&kind)) {
                    Ok(License::Named(kind))
                } else {
                    Err(SubmitError::invalid(format!(
                        "Param 'license' contains unknown license '{kind}'"
                    )))
                }
            }
        }
    }

    async fn dependencies(&self, doc: &Submission) -> Result<Vec<PluginDependency>, SubmitError> {
        let mut resolved = Vec::with_capacity(doc.deps.len());
        for (i, dep) in doc.deps.iter().enumerate() {
            let (target, is_hard) = dependency_target(i, dep)?;
            let dependency = match target {
                DependencyTarget::External { name, version } => PluginDependency {
                    name,
                    version,
                    dependency_release_id: None,
                    is_hard,
                },
                DependencyTarget::Internal { release_id } => {
                    let identity = self
                        .db
                        .get_release_identity(release_id)
                        .await?
                        .ok_or_else(|| {
                            SubmitError::invalid(format!("Param deps[{i}] declares invalid dependency"))
                        })?;
                    PluginDependency {
                        name: identity.name,
                        version: identity.version,
                        dependency_release_id: Some(identity.release_id),
                        is_hard,
                    }
                }
            };
            resolved.push(dependency);
        }
        Ok(resolved)
    }
}

fn short_desc(doc: &Submission) -> Result<String, SubmitError> {
    let short_desc = doc
        .short_desc
        .as_deref()
        .ok_or_else(|| SubmitError::invalid("Param 'shortDesc' missing"))?;
    if short_desc.chars().count() > MAX_SHORT_DESC_LENGTH {
        return Err(SubmitError::invalid(format!(
            "Short description is too long; at most {MAX_SHORT_DESC_LENGTH} characters are allowed"
        )));
    }
    Ok(short_desc.to_string())
}

fn version(doc: &Submission, previous_versions: &[String]) -> Result<String, SubmitError> {
    let version = doc
        .version
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SubmitError::invalid("Param 'version' missing"))?;
    if version.chars().count() > MAX_VERSION_LENGTH {
        return Err(SubmitError::invalid(format!(
            "Version is too long; at most {MAX_VERSION_LENGTH} characters are allowed"
        )));
    }
    if previous_versions.iter().any(|v| v == version) {
        return Err(SubmitError::invalid(
            "This version name has already been used for your plugin!",
        ));
    }
    Ok(version.to_string())
}

fn categories(doc: &Submission) -> Result<Vec<u32>, SubmitError> {
    let input = doc
        .categories
        .as_ref()
        .ok_or_else(|| SubmitError::invalid("Param 'categories' missing"))?;
    let major = input
        .major
        .ok_or_else(|| SubmitError::invalid("Param 'categories' missing major category"))?;
    let minor = input
        .minor
        .as_ref()
        .ok_or_else(|| SubmitError::invalid("Param 'categories' missing minor categories"))?;

    if !is_category(major) {
        return Err(SubmitError::invalid(format!("Unknown category {major}")));
    }
    let mut categories = vec![major];
    for &category in minor {
        if !is_category(category) {
            return Err(SubmitError::invalid(format!("Unknown category {category}")));
        }
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}

fn keywords(doc: &Submission) -> Result<Vec<String>, SubmitError> {
    let input = doc
        .keywords
        .as_ref()
        .ok_or_else(|| SubmitError::invalid("Param 'keywords' missing"))?;

    let mut seen = HashSet::new();
    let mut keywords: Vec<String> = input
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(*k))
        .map(str::to_string)
        .collect();
    if keywords.is_empty() {
        return Err(SubmitError::invalid(
            "Please enter at least one keyword so that others can search for your plugin!",
        ));
    }
    keywords.truncate(MAX_KEYWORD_COUNT);
    Ok(keywords)
}

fn spoons(doc: &Submission, apis: &ApiVersionTable) -> Result<Vec<Spoon>, SubmitError> {
    let input = doc
        .spoons
        .as_ref()
        .ok_or_else(|| SubmitError::invalid("Param 'spoons' missing"))?;
    if input.is_empty() {
        return Err(SubmitError::invalid(
            "You should at least declare one compatible API version!",
        ));
    }
    input
        .iter()
        .enumerate()
        .map(|(i, spoon)| spoon_range(i, spoon, apis))
        .collect()
}

fn spoon_range(i: usize, spoon: &SpoonInput, apis: &ApiVersionTable) -> Result<Spoon, SubmitError> {
    let api = spoon
        .api
        .as_ref()
        .ok_or_else(|| SubmitError::invalid(format!("Param spoons[{i}] missing property api")))?;
    let [from, to] = api.as_slice() else {
        return Err(SubmitError::invalid(format!(
            "Param spoons[{i}].api must contain exactly two versions"
        )));
    };
    let index = |version: &str| {
        apis.index_of(version)
            .ok_or_else(|| SubmitError::invalid(format!("Unknown API version {version}")))
    };
    Ok(Spoon::new(index(from.as_str())?, index(to.as_str())?))
}

fn dependency_target(
    i: usize,
    dep: &DependencyInput,
) -> Result<(DependencyTarget, bool), SubmitError> {
    let incorrect = || SubmitError::invalid(format!("Param deps[{i}] is incorrect"));

    let name = dep.name.as_deref().filter(|n| !n.is_empty()).ok_or_else(incorrect)?;
    let version = dep.version_string().ok_or_else(incorrect)?;
    let is_hard = match dep.softness.as_deref().ok_or_else(incorrect)? {
        "hard" => true,
        "soft" => false,
        _ => return Err(incorrect()),
    };

    let target = if name == SELF_RELEASE_MARKER {
        let release_id = version.trim().parse::<i64>().map_err(|_| {
            SubmitError::invalid(format!("Param deps[{i}] declares invalid dependency"))
        })?;
        DependencyTarget::Internal { release_id }
    } else {
        DependencyTarget::External {
            name: name.to_string(),
            version,
        }
    };
    Ok((target, is_hard))
}

fn permissions(doc: &Submission) -> Result<Vec<u32>, SubmitError> {
    let input = doc
        .perms
        .as_ref()
        .ok_or_else(|| SubmitError::invalid("Param 'perms' missing"))?;
    let mut permissions = Vec::with_capacity(input.len());
    for &perm in input {
        if !is_permission(perm) {
            return Err(SubmitError::invalid(format!("Unknown perm {perm}")));
        }
        if !permissions.contains(&perm) {
            permissions.push(perm);
        }
    }
    Ok(permissions)
}

fn requirements(doc: &Submission) -> Result<Vec<PluginRequirement>, SubmitError> {
    doc.reqr
        .iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value(value.clone()).map_err(|e| {
                SubmitError::invalid(format!("Param reqr[{i}] is incorrect: {e}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::CategoriesInput;

    #[test]
    fn test_plugin_name_pattern() {
        let pattern = &*PLUGIN_NAME;
        assert!(pattern.is_match("My_Plugin2"));
        assert!(pattern.is_match("ab"));
        assert!(!pattern.is_match("a"));
        assert!(!pattern.is_match("has space"));
        assert!(!pattern.is_match("dash-ed"));
    }

    #[test]
    fn test_keywords_drop_blanks_and_cap() {
        let mut doc = Submission {
            keywords: Some(vec!["".into(), "  ".into(), "pvp".into(), "pvp".into()]),
            ..Default::default()
        };
        assert_eq!(keywords(&doc).unwrap(), vec!["pvp".to_string()]);

        doc.keywords = Some((0..150).map(|i| format!("kw{i}")).collect());
        let capped = keywords(&doc).unwrap();
        assert_eq!(capped.len(), MAX_KEYWORD_COUNT);
        assert_eq!(capped[0], "kw0");

        doc.keywords = Some(vec!["".into()]);
        assert!(matches!(keywords(&doc), Err(SubmitError::Validation(_))));
    }

    #[test]
    fn test_spoons_are_ordered() {
        let apis = ApiVersionTable::default();
        let doc = Submission {
            spoons: Some(vec![SpoonInput {
                api: Some(vec!["2.0.0".into(), "1.0.0".into()]),
            }]),
            ..Default::default()
        };
        let spoons = spoons(&doc, &apis).unwrap();
        assert_eq!(spoons, vec![Spoon { since: 0, till: 18 }]);
    }

    #[test]
    fn test_spoons_reject_bad_shapes() {
        let apis = ApiVersionTable::default();
        let mut doc = Submission {
            spoons: Some(vec![]),
            ..Default::default()
        };
        assert!(spoons(&doc, &apis).is_err());

        doc.spoons = Some(vec![SpoonInput {
            api: Some(vec!["1.0.0".into()]),
        }]);
        assert!(spoons(&doc, &apis)
            .unwrap_err()
            .to_string()
            .contains("exactly two"));

        doc.spoons = Some(vec![SpoonInput {
            api: Some(vec!["1.0.0".into(), "9.9.9".into()]),
        }]);
        assert!(spoons(&doc, &apis)
            .unwrap_err()
            .to_string()
            .contains("Unknown API version 9.9.9"));
    }

    #[test]
    fn test_categories() {
        let mut doc = Submission {
            categories: Some(CategoriesInput {
                major: Some(3),
                minor: Some(vec![3, 5, 8]),
            }),
            ..Default::default()
        };
        assert_eq!(categories(&doc).unwrap(), vec![3, 5, 8]);

        doc.categories = Some(CategoriesInput {
            major: Some(99),
            minor: Some(vec![]),
        });
        assert!(categories(&doc).is_err());
    }

    #[test]
    fn test_dependency_target() {
        let external = DependencyInput {
            name: Some("EconomyAPI".into()),
            version: Some(serde_json::json!("2.0.9")),
            softness: Some("soft".into()),
        };
        assert_eq!(
            dependency_target(0, &external).unwrap(),
            (
                DependencyTarget::External {
                    name: "EconomyAPI".into(),
                    version: "2.0.9".into()
                },
                false
            )
        );

        let internal = DependencyInput {
            name: Some(SELF_RELEASE_MARKER.into()),
            version: Some(serde_json::json!(42)),
            softness: Some("hard".into()),
        };
        assert_eq!(
            dependency_target(1, &internal).unwrap(),
            (DependencyTarget::Internal { release_id: 42 }, true)
        );

        let garbage = DependencyInput {
            name: Some(SELF_RELEASE_MARKER.into()),
            version: Some(serde_json::json!("latest")),
            softness: Some("hard".into()),
        };
        assert!(dependency_target(2, &garbage)
            .unwrap_err()
            .to_string()
            .contains("deps[2] declares invalid dependency"));
    }

    #[test]
    fn test_version_rules() {
        let previous = vec!["1.0.0".to_string()];
        let mut doc = Submission {
            version: Some("1.0.0".into()),
            ..Default::default()
        };
        assert!(version(&doc, &previous).is_err());

        doc.version = Some("x".repeat(MAX_VERSION_LENGTH + 1));
        assert!(version(&doc, &[]).is_err());

        doc.version = Some("1.0.1".into());
        assert_eq!(version(&doc, &previous).unwrap(), "1.0.1");

        // limits are in characters, not bytes
        doc.version = Some("é".repeat(MAX_VERSION_LENGTH));
        assert!(version(&doc, &[]).is_ok());
    }

    #[test]
    fn test_short_desc_counts_characters() {
        let mut doc = Submission {
            short_desc: Some("ü".repeat(MAX_SHORT_DESC_LENGTH)),
            ..Default::default()
        };
        assert!(short_desc(&doc).is_ok());

        doc.short_desc = Some("ü".repeat(MAX_SHORT_DESC_LENGTH + 1));
        assert!(short_desc(&doc)
            .unwrap_err()
            .to_string()
            .contains("characters"));
    }
}
