//! HTTP transport for the JSONPlaceholder-style `/users` resource.

use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::domain::{FetchError, FetchResult, User, UserRepository};
use super::config::Config;

/// A user as it arrives on the wire.
///
/// Every field is optional here; [`User::try_from`] decides which ones are
/// required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUser {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl TryFrom<WireUser> for User {
    type Error = FetchError;

    fn try_from(wire: WireUser) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .ok_or_else(|| FetchError::Unrecognized("malformed user record: missing id".to_string()))?;
        let name = wire.name.ok_or_else(|| {
            FetchError::Unrecognized(format!("malformed user record {}: missing name", id))
        })?;

        Ok(User {
            id,
            name,
            username: wire.username,
            email: wire.email,
            phone: wire.phone,
        })
    }
}

/// [`UserRepository`] backed by a blocking reqwest client.
pub struct HttpUserRepository {
    client: Client,
    base_url: String,
}

impl HttpUserRepository {
    pub fn new(config: &Config) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Unrecognized(format!("Could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> FetchResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        self.client.get(&url).send().map_err(|e| {
            let err = classify(&e);
            warn!("GET {} failed: {}", url, e);
            err
        })
    }
}

impl UserRepository for HttpUserRepository {
    fn fetch_users(&self) -> FetchResult<Vec<User>> {
        let response = ensure_success(self.get("/users")?)?;
        let wire: Vec<WireUser> = response.json().map_err(|e| decode_error(&e))?;
        debug!("received {} user records", wire.len());
        wire.into_iter().map(User::try_from).collect()
    }

    fn fetch_user(&self, id: u64) -> FetchResult<User> {
        let response = self.get(&format!("/users/{}", id))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::Unrecognized(format!("user {} not found", id)));
        }
        let wire: WireUser = ensure_success(response)?
            .json()
            .map_err(|e| decode_error(&e))?;
        User::try_from(wire)
    }
}

fn ensure_success(response: Response) -> FetchResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!("{} responded with {}", response.url(), status);
        Err(FetchError::Unrecognized(format!("server responded with {}", status)))
    }
}

fn classify(error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::TimedOut
    } else if error.is_connect() {
        FetchError::NoConnectivity
    } else if error.is_decode() {
        decode_error(error)
    } else {
        FetchError::Unrecognized(error.to_string())
    }
}

fn decode_error(error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::TimedOut;
    }
    FetchError::Unrecognized(format!("malformed response: {}", error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one canned HTTP response on a local port.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            request_line
        });
        (base_url, handle)
    }

    fn repository_for(base_url: &str, timeout_secs: u64) -> HttpUserRepository {
        let config = Config {
            base_url: base_url.to_string(),
            request_timeout_secs: timeout_secs,
            connect_timeout_secs: timeout_secs,
            ..Config::default()
        };
        HttpUserRepository::new(&config).unwrap()
    }

    #[test]
    fn test_wire_user_maps_field_by_field() {
        let wire: WireUser =
            serde_json::from_str(r#"{"id":1,"name":"Ada","email":"ada@x.com"}"#).unwrap();
        let user = User::try_from(wire).unwrap();

        assert_eq!(user, User::new(1, "Ada").with_email("ada@x.com"));
        // Absent optional fields stay absent
        assert!(user.username.is_none());
        assert!(user.phone.is_none());
    }

    #[test]
    fn test_wire_user_ignores_unknown_fields() {
        let wire: WireUser = serde_json::from_str(
            r#"{"id":3,"name":"Clementine","username":"Samantha","address":{"city":"McKenziehaven"},"website":"ramiro.info"}"#,
        )
        .unwrap();
        let user = User::try_from(wire).unwrap();
        assert_eq!(user.username.as_deref(), Some("Samantha"));
    }

    #[test]
    fn test_wire_user_missing_required_fields() {
        let missing_id = WireUser {
            name: Some("Nobody".into()),
            ..WireUser::default()
        };
        assert_eq!(
            User::try_from(missing_id),
            Err(FetchError::Unrecognized("malformed user record: missing id".into()))
        );

        let missing_name = WireUser {
            id: Some(4),
            ..WireUser::default()
        };
        assert_eq!(
            User::try_from(missing_name),
            Err(FetchError::Unrecognized("malformed user record 4: missing name".into()))
        );
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let repo = repository_for("http://localhost:9/", 1);
        assert_eq!(repo.base_url(), "http://localhost:9");
    }

    #[test]
    fn test_fetch_users_success() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id":1,"name":"Leanne Graham","username":"Bret","email":"Sincere@april.biz","phone":"1-770-736-8031 x56442"}]"#,
        );
        let repo = repository_for(&base_url, 5);

        let users = repo.fetch_users().unwrap();
        assert_eq!(
            users,
            vec![User::new(1, "Leanne Graham")
                .with_username("Bret")
                .with_email("Sincere@april.biz")
                .with_phone("1-770-736-8031 x56442")]
        );
        assert!(server.join().unwrap().starts_with("GET /users HTTP/1.1"));
    }

    #[test]
    fn test_fetch_user_by_id() {
        let (base_url, server) = serve_once("200 OK", r#"{"id":2,"name":"Ervin Howell"}"#);
        let repo = repository_for(&base_url, 5);

        assert_eq!(repo.fetch_user(2).unwrap(), User::new(2, "Ervin Howell"));
        assert!(server.join().unwrap().starts_with("GET /users/2 HTTP/1.1"));
    }

    #[test]
    fn test_fetch_user_not_found() {
        let (base_url, server) = serve_once("404 Not Found", "{}");
        let repo = repository_for(&base_url, 5);

        assert_eq!(
            repo.fetch_user(11),
            Err(FetchError::Unrecognized("user 11 not found".into()))
        );
        server.join().unwrap();
    }

    #[test]
    fn test_server_error_is_unrecognized() {
        let (base_url, server) = serve_once("500 Internal Server Error", "oops");
        let repo = repository_for(&base_url, 5);

        match repo.fetch_users() {
            Err(FetchError::Unrecognized(message)) => assert!(message.contains("500")),
            other => panic!("unexpected result: {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_malformed_record_fails_whole_fetch() {
        let (base_url, server) = serve_once("200 OK", r#"[{"id":1,"name":"Ok"},{"name":"No id"}]"#);
        let repo = repository_for(&base_url, 5);

        assert_eq!(
            repo.fetch_users(),
            Err(FetchError::Unrecognized("malformed user record: missing id".into()))
        );
        server.join().unwrap();
    }

    #[test]
    fn test_invalid_json_is_malformed_response() {
        let (base_url, server) = serve_once("200 OK", "not json");
        let repo = repository_for(&base_url, 5);

        match repo.fetch_users() {
            Err(FetchError::Unrecognized(message)) => assert!(message.starts_with("malformed response")),
            other => panic!("unexpected result: {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_refused_connection_is_no_connectivity() {
        // Grab a free port, then close it so nothing is listening
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let repo = repository_for(&format!("http://127.0.0.1:{}", port), 5);

        assert_eq!(repo.fetch_users(), Err(FetchError::NoConnectivity));
    }

    #[test]
    fn test_silent_server_times_out() {
        // Connections queue in the backlog but never get a response
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let repo = repository_for(&format!("http://{}", listener.local_addr().unwrap()), 1);

        assert_eq!(repo.fetch_users(), Err(FetchError::TimedOut));
        drop(listener);
    }
}
