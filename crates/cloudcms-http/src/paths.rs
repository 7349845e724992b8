//! API path builders.
//!
//! Identifiers are percent-encoded, so an id holding `/`, `?` or `#` stays
//! one path segment.

use std::borrow::Cow;

fn seg(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

pub(crate) fn job(job_id: &str) -> String {
    format!("/jobs/{}", seg(job_id))
}

pub(crate) fn project(project_id: &str) -> String {
    format!("/projects/{}", seg(project_id))
}

pub(crate) fn repository(repository_id: &str) -> String {
    format!("/repositories/{}", seg(repository_id))
}

pub(crate) fn branches(repository_id: &str) -> String {
    format!("{}/branches", repository(repository_id))
}

pub(crate) fn branch(repository_id: &str, branch_id: &str) -> String {
    format!("{}/{}", branches(repository_id), seg(branch_id))
}

pub(crate) fn nodes(repository_id: &str, branch_id: &str) -> String {
    format!("{}/nodes", branch(repository_id, branch_id))
}

pub(crate) fn node(repository_id: &str, branch_id: &str, node_id: &str) -> String {
    format!("{}/{}", nodes(repository_id, branch_id), seg(node_id))
}

pub(crate) fn attachment(
    repository_id: &str,
    branch_id: &str,
    node_id: &str,
    attachment_id: &str,
) -> String {
    format!(
        "{}/attachments/{}",
        node(repository_id, branch_id, node_id),
        seg(attachment_id)
    )
}

pub(crate) fn feature(repository_id: &str, branch_id: &str, node_id: &str, feature_id: &str) -> String {
    format!(
        "{}/features/{}",
        node(repository_id, branch_id, node_id),
        seg(feature_id)
    )
}

pub(crate) fn version(
    repository_id: &str,
    branch_id: &str,
    node_id: &str,
    changeset_id: &str,
) -> String {
    format!(
        "{}/versions/{}",
        node(repository_id, branch_id, node_id),
        seg(changeset_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_path() {
        assert_eq!(node("r1", "master", "n1"), "/repositories/r1/branches/master/nodes/n1");
        assert_eq!(nodes("r1", "b1"), "/repositories/r1/branches/b1/nodes");
    }

    #[test]
    fn ids_stay_single_segments() {
        assert_eq!(
            node("r1", "master", "a/b?c#d"),
            "/repositories/r1/branches/master/nodes/a%2Fb%3Fc%23d"
        );
        assert_eq!(
            attachment("r1", "master", "n1", "thumb 1"),
            "/repositories/r1/branches/master/nodes/n1/attachments/thumb%201"
        );
        assert_eq!(job("../platform"), "/jobs/..%2Fplatform");
    }
}
