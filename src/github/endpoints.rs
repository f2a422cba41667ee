// GitHub API endpoint functions.
// Fetches pages of a user's starred repositories and reads pagination links.

use log::debug;
use reqwest::{Url, header::LINK};

use crate::error::{FindstarError, Result};
use crate::star::StarRecord;

use super::client::GitHubClient;
use super::paging::StarSource;
use super::types::{PageLinks, StarPage, StarredRepo};

impl GitHubClient {
    /// Get one page of repositories starred by `username`.
    pub async fn get_starred_page(&mut self, username: &str, page: u32) -> Result<StarPage> {
        let params = [
            ("per_page", self.per_page().to_string()),
            ("page", page.to_string()),
        ];
        let response = self
            .get_with_params(&["users", username, "starred"], &params)
            .await?;

        let status = response.status().as_u16();
        let links = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        let body = response.text().await?;
        let repos: Vec<StarredRepo> =
            serde_json::from_str(&body).map_err(|e| FindstarError::Api {
                status,
                message: format!("malformed starred repositories response: {e}"),
            })?;

        debug!(
            "page {} for {}: {} repositories, next={:?}, last={:?}",
            page,
            username,
            repos.len(),
            links.next,
            links.last
        );

        Ok(StarPage {
            records: repos.into_iter().map(StarRecord::from).collect(),
            has_next: links.next.is_some(),
            last_page: links.last,
        })
    }
}

impl StarSource for GitHubClient {
    async fn fetch_page(&mut self, username: &str, page: u32) -> Result<StarPage> {
        self.get_starred_page(username, page).await
    }
}

/// Parse a `Link` header into next/last page numbers.
///
/// Format: `<https://api.github.com/...&page=2>; rel="next", <...&page=5>; rel="last"`.
pub fn parse_link_header(header: &str) -> PageLinks {
    let mut links = PageLinks::default();

    for part in header.split(',') {
        let mut pieces = part.split(';');
        let Some(target) = pieces.next() else {
            continue;
        };
        let Some(page) = page_param(target) else {
            continue;
        };

        for param in pieces {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if key.trim() != "rel" {
                continue;
            }
            for rel in value.trim().trim_matches('"').split_whitespace() {
                match rel {
                    "next" => links.next = Some(page),
                    "last" => links.last = Some(page),
                    _ => {}
                }
            }
        }
    }

    links
}

/// Extract the `page` query parameter from `<url>`.
fn page_param(target: &str) -> Option<u32> {
    let url = target
        .trim()
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))?;
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fetch_all;
    use chrono::DateTime;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serve `responses` one connection each, in order. Returns the base URL
    /// and a channel of the request heads received.
    async fn serve(responses: Vec<String>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                let _ = tx.send(String::from_utf8_lossy(&head).to_lowercase());
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        (base, rx)
    }

    fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
        let mut text = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
            body.len()
        );
        for (name, value) in headers {
            text.push_str(&format!("{name}: {value}\r\n"));
        }
        text.push_str("\r\n");
        text.push_str(body);
        text
    }

    #[tokio::test]
    async fn test_get_starred_page_reads_records_and_links() {
        let body = r#"[
            {"full_name": "a/x", "html_url": "https://github.com/a/x", "description": null, "language": null},
            {"full_name": "b/y", "html_url": "https://github.com/b/y", "description": "ldap samba", "language": "C", "topics": ["auth"]}
        ]"#;
        let link = r#"<http://127.0.0.1/users/octocat/starred?page=2>; rel="next", <http://127.0.0.1/users/octocat/starred?page=3>; rel="last""#;
        let (base, mut heads) = serve(vec![http_response(
            "200 OK",
            &[
                ("Link", link),
                ("x-ratelimit-limit", "60"),
                ("x-ratelimit-remaining", "59"),
            ],
            body,
        )])
        .await;

        let mut client = GitHubClient::new(&base, Some("secret"), 100).unwrap();
        let page = client.get_starred_page("octocat", 1).await.unwrap();

        assert_eq!(
            page.records,
            vec![
                StarRecord::new("a/x", "https://github.com/a/x"),
                StarRecord::new("b/y", "https://github.com/b/y")
                    .with_description("ldap samba")
                    .with_language("C")
                    .with_topics(["auth"]),
            ]
        );
        assert!(page.has_next);
        assert_eq!(page.last_page, Some(3));
        assert_eq!(client.rate_limit().limit, 60);
        assert_eq!(client.rate_limit().remaining, Some(59));

        let head = heads.recv().await.unwrap();
        assert!(head.starts_with("get /users/octocat/starred?per_page=100&page=1 http/1.1"));
        assert!(head.contains("user-agent: findstar"));
        assert!(head.contains("authorization: bearer secret"));
        assert!(head.contains("x-github-api-version: 2022-11-28"));
    }

    #[tokio::test]
    async fn test_get_starred_page_without_link_is_last() {
        let (base, mut heads) = serve(vec![http_response("200 OK", &[], "[]")]).await;

        let mut client = GitHubClient::new(&base, None, 100).unwrap();
        let page = client.get_starred_page("octocat", 4).await.unwrap();

        assert!(page.records.is_empty());
        assert!(!page.has_next);
        assert_eq!(page.last_page, None);
        assert!(!heads.recv().await.unwrap().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_get_starred_page_rejects_malformed_body() {
        let (base, _heads) = serve(vec![http_response("200 OK", &[], r#"{"a":1}"#)]).await;

        let mut client = GitHubClient::new(&base, None, 100).unwrap();
        match client.get_starred_page("octocat", 1).await.unwrap_err() {
            FindstarError::Api { status, message } => {
                assert_eq!(status, 200);
                assert!(message.starts_with("malformed starred repositories response"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_starred_page_not_found() {
        let (base, _heads) = serve(vec![http_response(
            "404 Not Found",
            &[],
            r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#,
        )])
        .await;

        let mut client = GitHubClient::new(&base, None, 100).unwrap();
        match client.get_starred_page("nobody", 1).await.unwrap_err() {
            FindstarError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_starred_page_exhausted_quota() {
        let (base, _heads) = serve(vec![http_response(
            "403 Forbidden",
            &[
                ("x-ratelimit-limit", "60"),
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1700000600"),
            ],
            r#"{"message":"API rate limit exceeded"}"#,
        )])
        .await;

        let mut client = GitHubClient::new(&base, None, 100).unwrap();
        let err = client.get_starred_page("octocat", 1).await.unwrap_err();

        match err {
            FindstarError::RateLimited { reset_at } => {
                assert_eq!(reset_at, DateTime::from_timestamp(1_700_000_600, 0));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.rate_limit().remaining, Some(0));
    }

    #[tokio::test]
    async fn test_get_starred_page_retry_after_date() {
        let (base, _heads) = serve(vec![http_response(
            "429 Too Many Requests",
            &[("Retry-After", "Wed, 21 Oct 2015 07:28:00 GMT")],
            "",
        )])
        .await;

        let mut client = GitHubClient::new(&base, None, 100).unwrap();
        let err = client.get_starred_page("octocat", 1).await.unwrap_err();

        assert!(matches!(
            err,
            FindstarError::RateLimited { reset_at } if reset_at == DateTime::from_timestamp(1_445_412_480, 0)
        ));
    }

    #[tokio::test]
    async fn test_fetch_all_follows_next_links() {
        let first = r#"[
            {"full_name": "a/x", "html_url": "https://github.com/a/x"},
            {"full_name": "b/y", "html_url": "https://github.com/b/y"}
        ]"#;
        let second = r#"[
            {"full_name": "b/y", "html_url": "https://github.com/b/y"},
            {"full_name": "c/z", "html_url": "https://github.com/c/z"}
        ]"#;
        let link = r#"<http://127.0.0.1/users/octocat/starred?page=2>; rel="next", <http://127.0.0.1/users/octocat/starred?page=2>; rel="last""#;
        let (base, mut heads) = serve(vec![
            http_response("200 OK", &[("Link", link)], first),
            http_response("200 OK", &[], second),
        ])
        .await;

        let mut client = GitHubClient::new(&base, None, 2).unwrap();
        let records = fetch_all(&mut client, "octocat").await.unwrap();

        let names: Vec<_> = records.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, ["a/x", "b/y", "c/z"]);
        assert!(heads.recv().await.unwrap().contains("per_page=2&page=1 "));
        assert!(heads.recv().await.unwrap().contains("per_page=2&page=2 "));
    }

    #[test]
    fn test_parse_link_header_first_page() {
        let header = r#"<https://api.github.com/user/583231/starred?per_page=100&page=2>; rel="next", <https://api.github.com/user/583231/starred?per_page=100&page=7>; rel="last""#;
        assert_eq!(
            parse_link_header(header),
            PageLinks {
                next: Some(2),
                last: Some(7)
            }
        );
    }

    #[test]
    fn test_parse_link_header_last_page() {
        let header = r#"<https://api.github.com/user/1/starred?page=6>; rel="prev", <https://api.github.com/user/1/starred?page=1>; rel="first""#;
        assert_eq!(parse_link_header(header), PageLinks::default());
    }

    #[test]
    fn test_parse_link_header_ignores_junk() {
        assert_eq!(parse_link_header(""), PageLinks::default());
        assert_eq!(
            parse_link_header(r#"not-a-link; rel="next", <https://x.test/?page=abc>; rel="last""#),
            PageLinks::default()
        );
    }
}
