use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::future::Future;

use super::CheckError;
use crate::config::ConfigError;
use crate::platform::PlatformError;

/// Run `check` once per project ref and key the results by ref.
///
/// Every client is resolved through `connect` before the first outbound call,
/// so a ref without a credential fails the request up front. The checks then
/// run concurrently and the first failure discards everything.
pub async fn fan_out<C, T, Fut>(
    refs: Vec<String>,
    mut connect: impl FnMut(&str) -> Result<C, ConfigError>,
    check: impl Fn(String, C) -> Fut,
) -> Result<BTreeMap<String, T>, CheckError>
where
    Fut: Future<Output = Result<T, PlatformError>>,
{
    let clients = refs
        .into_iter()
        .map(|project_ref| {
            let client = connect(&project_ref)?;
            Ok((project_ref, client))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    tracing::debug!("Fanning out over {} projects", clients.len());

    let pending = clients.into_iter().map(|(project_ref, client)| {
        let result = check(project_ref.clone(), client);
        async move {
            match result.await {
                Ok(value) => Ok((project_ref, value)),
                Err(source) => Err(CheckError::for_project(project_ref, source)),
            }
        }
    });

    Ok(try_join_all(pending).await?.into_iter().collect())
}
