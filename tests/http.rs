use once_cell::sync::Lazy;
use reqwest::{redirect, Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Day {
    comment: String,
}

#[derive(Debug, Deserialize)]
struct HabitSummary {
    id: u32,
    name: String,
    days: Vec<Day>,
    progress: u8,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    habits: Vec<HabitSummary>,
    active_habit_id: Option<u32>,
}

struct TestServer {
    base_url: String,
    data_path: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("habit_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/habits")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("HABIT_DATA_PATH", &data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn fetch_state(client: &Client, base_url: &str) -> StateResponse {
    client
        .get(format!("{base_url}/api/habits"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn create_habit(client: &Client, base_url: &str, name: &str, target: serde_json::Value) -> StateResponse {
    let response = client
        .post(format!("{base_url}/api/habits"))
        .json(&serde_json::json!({ "name": name, "target": target, "icon": "run" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_create_log_and_remove_day() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_state(&client, &server.base_url).await;
    let expected_id = before.habits.iter().map(|h| h.id).max().unwrap_or(0) + 1;

    let created = create_habit(&client, &server.base_url, "Run", serde_json::json!("30")).await;
    assert_eq!(created.habits.len(), before.habits.len() + 1);
    assert_eq!(created.active_habit_id, Some(expected_id));

    let logged: StateResponse = client
        .post(format!("{}/api/habits/{expected_id}/days", server.base_url))
        .json(&serde_json::json!({ "comment": "5km" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let habit = logged.habits.iter().find(|h| h.id == expected_id).unwrap();
    assert_eq!(habit.name, "Run");
    assert_eq!(habit.days.len(), 1);
    assert_eq!(habit.days[0].comment, "5km");
    assert_eq!(habit.progress, 3);

    let stored = std::fs::read_to_string(&server.data_path).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert!(stored.as_array().unwrap().iter().any(|h| h["id"] == expected_id));

    let removed: StateResponse = client
        .delete(format!("{}/api/habits/{expected_id}/days/0", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let habit = removed.habits.iter().find(|h| h.id == expected_id).unwrap();
    assert!(habit.days.is_empty());
    assert_eq!(habit.progress, 0);
}

#[tokio::test]
async fn http_invalid_habit_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_state(&client, &server.base_url).await;
    for body in [
        serde_json::json!({ "name": "", "target": 10, "icon": "run" }),
        serde_json::json!({ "name": "Read", "icon": "book" }),
        serde_json::json!({ "name": "Read", "target": 0, "icon": "book" }),
    ] {
        let response = client
            .post(format!("{}/api/habits", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let after = fetch_state(&client, &server.base_url).await;
    assert_eq!(after.habits.len(), before.habits.len());
}

#[tokio::test]
async fn http_stale_references_are_not_found() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let created = create_habit(&client, &server.base_url, "Water", serde_json::json!(8)).await;
    let id = created.active_habit_id.unwrap();

    let response = client
        .put(format!("{}/api/habits/999999/active", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("{}/api/habits/{id}/days/5", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let state = fetch_state(&client, &server.base_url).await;
    assert_eq!(state.active_habit_id, Some(id));
}

#[tokio::test]
async fn http_form_submit_redirects_to_fragment() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();

    let response = client
        .post(format!("{}/habits", server.base_url))
        .form(&[("name", "Read"), ("target", "12"), ("icon", "book")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let state = fetch_state(&client, &server.base_url).await;
    let id = state.active_habit_id.unwrap();
    let location = response.headers()["location"].to_str().unwrap();
    assert_eq!(location, format!("/#{id}"));

    let response = client
        .post(format!("{}/days", server.base_url))
        .form(&[("comment", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let state = fetch_state(&client, &server.base_url).await;
    let habit = state.habits.iter().find(|h| h.id == id).unwrap();
    assert!(habit.days.is_empty());
}

#[tokio::test]
async fn http_page_keeps_one_menu_entry_per_habit() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    create_habit(&client, &server.base_url, "Sleep", serde_json::json!("7")).await;
    let state = fetch_state(&client, &server.base_url).await;

    let mut pages = Vec::new();
    for _ in 0..2 {
        let page = client
            .get(format!("{}/", server.base_url))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        pages.push(page);
    }

    assert_eq!(pages[0], pages[1]);
    assert_eq!(pages[0].matches("data-habit-id=").count(), state.habits.len());
    assert!(pages[0].contains("<h1 class=\"h1\">Sleep</h1>"));
    assert!(!pages[0].contains("onclick"));
}
