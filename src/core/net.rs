// src/core/net.rs
// Fetch collaborator. The core only needs "URL in, HTML + redirect chain out";
// `HttpFetcher` is the std-only default: HTTP/1.0 over TCP, no TLS, plus
// `file://` snapshots of previously saved pages.

use std::{ io::{ Read, Write }, net::TcpStream, time::Duration };

use tracing::debug;
use url::Url;

use crate::config::consts::{ HTTP_TIMEOUT_SECS, MAX_REDIRECTS };
use crate::error::{ Error, Result };

/// A fetched page. `chain` holds every URL visited *before* `final_url`
/// (empty when there was no redirect).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetched {
    pub body: String,
    pub final_url: String,
    pub chain: Vec<String>,
}

pub trait Fetch: Sync {
    fn fetch(&self, url: &str) -> Result<Fetched>;
}

pub struct HttpFetcher {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            max_redirects: MAX_REDIRECTS,
            user_agent: join!("lender_cache/", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Fetched> {
        let mut current = Url::parse(url).map_err(|e| Error::fetch(url, e))?;
        let mut chain = Vec::new();

        loop {
            let resp = match current.scheme() {
                "file" => {
                    let path = current
                        .to_file_path()
                        .map_err(|_| Error::fetch(current.as_str(), "not a local file path"))?;
                    let body = std::fs::read_to_string(&path)
                        .map_err(|e| Error::fetch(current.as_str(), e))?;
                    Response::Ok(body)
                }
                "http" => self.get(&current)?,
                other => {
                    return Err(Error::fetch(
                        current.as_str(),
                        format!("scheme '{other}' not supported; save the page and use file://"),
                    ));
                }
            };

            match resp {
                Response::Ok(body) => {
                    return Ok(Fetched { body, final_url: current.to_string(), chain });
                }
                Response::Redirect(location) => {
                    if chain.len() >= self.max_redirects {
                        return Err(Error::fetch(url, format!("more than {} redirects", self.max_redirects)));
                    }
                    let next = current
                        .join(&location)
                        .map_err(|e| Error::fetch(current.as_str(), format!("bad Location '{location}': {e}")))?;
                    debug!(from = %current, to = %next, "redirect");
                    chain.push(current.to_string());
                    current = next;
                }
            }
        }
    }
}

enum Response {
    Ok(String),
    Redirect(String),
}

impl HttpFetcher {
    fn get(&self, url: &Url) -> Result<Response> {
        let host = url.host_str().ok_or_else(|| Error::fetch(url.as_str(), "missing host"))?;
        let port = url.port_or_known_default().unwrap_or(80);
        let mut path = s!(url.path());
        if let Some(q) = url.query() {
            path.push('?');
            path.push_str(q);
        }

        let mut s = TcpStream::connect((host, port)).map_err(|e| Error::fetch(url.as_str(), e))?;
        s.set_read_timeout(Some(self.timeout))?;
        s.set_write_timeout(Some(self.timeout))?;

        let req = format!(
            "GET {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: {}\r\nAccept: text/html\r\nConnection: close\r\n\r\n",
            path, host, self.user_agent
        );
        s.write_all(req.as_bytes())?;
        s.flush()?;

        let mut buf = Vec::new();
        s.read_to_end(&mut buf).map_err(|e| Error::fetch(url.as_str(), e))?;
        parse_response(&String::from_utf8_lossy(&buf)).map_err(|reason| Error::fetch(url.as_str(), reason))
    }
}

fn parse_response(resp: &str) -> std::result::Result<Response, String> {
    let head_end = resp.find("\r\n\r\n").ok_or("Malformed HTTP response")?;
    let head = &resp[..head_end];
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or("");
    let code: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|c| c.parse().ok())
        .ok_or_else(|| format!("Bad status line: {status_line}"))?;

    match code {
        200 => Ok(Response::Ok(resp[head_end + 4..].to_string())),
        301 | 302 | 303 | 307 | 308 => lines
            .find_map(|l| {
                let (k, v) = l.split_once(':')?;
                k.trim().eq_ignore_ascii_case("location").then(|| v.trim().to_string())
            })
            .map(Response::Redirect)
            .ok_or_else(|| format!("HTTP {code} without Location")),
        _ => Err(format!("HTTP error: {status_line}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ok_body() {
        let r = parse_response("HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\n<html></html>").unwrap();
        assert!(matches!(r, Response::Ok(b) if b == "<html></html>"));
    }

    #[test]
    fn parse_redirect_location() {
        let r = parse_response("HTTP/1.1 301 Moved\r\nlocation: /en/lending-companies/acme\r\n\r\n").unwrap();
        assert!(matches!(r, Response::Redirect(l) if l == "/en/lending-companies/acme"));
    }

    #[test]
    fn parse_errors() {
        assert!(parse_response("HTTP/1.0 404 Not Found\r\n\r\n").is_err());
        assert!(parse_response("HTTP/1.0 302 Found\r\n\r\n").is_err());
        assert!(parse_response("garbage").is_err());
    }

    #[test]
    fn file_snapshot_has_no_chain() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("acme.html");
        std::fs::write(&page, "<a href='a.pdf'>A</a>").unwrap();
        let url = Url::from_file_path(&page).unwrap();

        let got = HttpFetcher::default().fetch(url.as_str()).unwrap();
        assert_eq!(got.body, "<a href='a.pdf'>A</a>");
        assert!(got.chain.is_empty());
        assert_eq!(got.final_url, url.as_str());
    }

    #[test]
    fn unsupported_scheme_is_a_fetch_error() {
        let err = HttpFetcher::default().fetch("https://www.mintos.com/en/").unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
