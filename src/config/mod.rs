use std::collections::{BTreeMap, HashMap};
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_MANAGEMENT_API_URL: &str = "https://api.supabase.com";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_MAX_PAGES: u32 = 1000;
const DEFAULT_PITR_CONCURRENCY: usize = 8;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Configuration problems, either fatal at startup or surfaced per request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: String, reason: String },

    #[error("No service-role key configured for project '{0}'")]
    MissingCredential(String),

    #[error("MANAGEMENT_API_BEARER_TOKEN is not configured")]
    MissingManagementToken,

    #[error("Primary project ref is unknown; set PLATFORM_PROJECT_REF")]
    MissingProjectRef,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub platform: PlatformConfig,
    pub management: ManagementConfig,
    pub checks: CheckConfig,
    /// Multi-project credential map, keyed by project ref
    pub projects: BTreeMap<String, ProjectCredential>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub url: Url,
    pub anon_key: String,
    pub service_role_key: String,
    pub project_ref: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ManagementConfig {
    pub url: Url,
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub page_size: u32,
    /// Upper bound on auth admin pages fetched per listing
    pub max_pages: u32,
    pub pitr_max_concurrency: usize,
    pub upstream_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ProjectCredential {
    pub url: Url,
    pub service_role_key: Option<String>,
}

impl AppConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars())
    }

    /// Build configuration from an explicit set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();

        let url = parse_url("PLATFORM_URL", required(&vars, "PLATFORM_URL")?)?;
        let anon_key = required(&vars, "PLATFORM_ANON_KEY")?.to_string();
        let service_role_key = required(&vars, "PLATFORM_SERVICE_ROLE_KEY")?.to_string();
        let project_ref = vars
            .get("PLATFORM_PROJECT_REF")
            .cloned()
            .or_else(|| project_ref_from_url(&url));

        let management = ManagementConfig {
            url: parse_url(
                "MANAGEMENT_API_URL",
                vars.get("MANAGEMENT_API_URL")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_MANAGEMENT_API_URL),
            )?,
            bearer_token: vars.get("MANAGEMENT_API_BEARER_TOKEN").cloned(),
        };

        let checks = CheckConfig {
            page_size: parse_or(&vars, "AUTH_ADMIN_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_pages: parse_or(&vars, "AUTH_ADMIN_MAX_PAGES", DEFAULT_MAX_PAGES)?,
            pitr_max_concurrency: parse_or(&vars, "PITR_MAX_CONCURRENCY", DEFAULT_PITR_CONCURRENCY)?,
            upstream_timeout: Duration::from_secs(parse_or(
                &vars,
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
        };
        if checks.page_size == 0 {
            return Err(invalid("AUTH_ADMIN_PAGE_SIZE", "must be greater than zero"));
        }
        if checks.max_pages == 0 {
            return Err(invalid("AUTH_ADMIN_MAX_PAGES", "must be greater than zero"));
        }
        if checks.pitr_max_concurrency == 0 {
            return Err(invalid("PITR_MAX_CONCURRENCY", "must be greater than zero"));
        }

        Ok(Self {
            server: ServerConfig {
                port: parse_or(&vars, "PORT", DEFAULT_PORT)?,
            },
            platform: PlatformConfig {
                url,
                anon_key,
                service_role_key,
                project_ref,
            },
            management,
            checks,
            projects: project_credentials(&vars)?,
        })
    }

    /// True when PROJECT_<N>_REF entries are configured
    pub fn is_multi_project(&self) -> bool {
        !self.projects.is_empty()
    }

    /// Primary project ref, required for single-project SQL checks
    pub fn primary_project_ref(&self) -> Result<&str, ConfigError> {
        self.platform
            .project_ref
            .as_deref()
            .ok_or(ConfigError::MissingProjectRef)
    }

    pub fn project_refs(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }
}

fn required<'a>(vars: &'a HashMap<String, String>, name: &'static str) -> Result<&'a str, ConfigError> {
    vars.get(name)
        .map(String::as_str)
        .ok_or(ConfigError::MissingVar(name))
}

fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidVar {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| invalid(name, e.to_string()))
}

fn parse_or<T>(vars: &HashMap<String, String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(name) {
        Some(v) => v.trim().parse().map_err(|e: T::Err| invalid(name, e.to_string())),
        None => Ok(default),
    }
}

/// `https://abcdefgh.supabase.co` -> `abcdefgh`
fn project_ref_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let (label, rest) = host.split_once('.')?;
    if rest.starts_with("supabase.") && !label.is_empty() {
        Some(label.to_string())
    } else {
        None
    }
}

/// Collect PROJECT_<N>_REF / PROJECT_<N>_SERVICE_ROLE_KEY / PROJECT_<N>_URL groups.
///
/// A ref without a key is kept: the fan-out refuses it at request time.
fn project_credentials(
    vars: &HashMap<String, String>,
) -> Result<BTreeMap<String, ProjectCredential>, ConfigError> {
    let mut projects = BTreeMap::new();

    // Numeric index order, so a duplicate is always reported at its later index
    let mut entries: Vec<(u64, &str, &String)> = vars
        .iter()
        .filter_map(|(name, project_ref)| {
            let index = name.strip_prefix("PROJECT_")?.strip_suffix("_REF")?;
            if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            Some((index.parse().ok()?, index, project_ref))
        })
        .collect();
    entries.sort();

    for (_, index, project_ref) in entries {
        let project_ref = project_ref.trim().to_string();
        let url_var = format!("PROJECT_{}_URL", index);
        let url = match vars.get(&url_var) {
            Some(v) => parse_url(&url_var, v)?,
            None => parse_url(&url_var, &format!("https://{}.supabase.co", project_ref))?,
        };
        let service_role_key = vars.get(&format!("PROJECT_{}_SERVICE_ROLE_KEY", index)).cloned();
        if service_role_key.is_none() {
            tracing::warn!("PROJECT_{}_REF={} has no service-role key configured", index, project_ref);
        }

        if projects
            .insert(project_ref.clone(), ProjectCredential { url, service_role_key })
            .is_some()
        {
            return Err(invalid(
                &format!("PROJECT_{}_REF", index),
                format!("project '{}' is configured more than once", project_ref),
            ));
        }
    }

    Ok(projects)
}
