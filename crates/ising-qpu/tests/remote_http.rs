use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ising_core::{CouplingSpec, FieldSpec, SampleParams, Sampler};
use ising_qpu::{DWaveSampler, EmbeddingComposite, SapiClient, SapiConfig};
use serde_json::{json, Value};

const TOKEN: &str = "DEV-loopback";

#[derive(Debug, Clone)]
struct Request {
    method: String,
    path: String,
    token: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Request>>>;

/// Serves `handler` on a loopback port; returns the endpoint and the request log.
fn serve<F>(handler: F) -> (String, Log)
where
    F: Fn(&Request) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/sapi/", listener.local_addr().unwrap());
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            let request = read_request(&stream);
            let (status, body) = handler(&request);
            seen.lock().unwrap().push(request);
            write_response(stream, status, &body);
        }
    });
    (endpoint, log)
}

fn read_request(stream: &TcpStream) -> Request {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut length = 0;
    let mut token = None;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).unwrap();
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => length = value.trim().parse().unwrap(),
                "x-auth-token" => token = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }
    let mut body = vec![0; length];
    reader.read_exact(&mut body).unwrap();
    Request {
        method,
        path: path.trim_start_matches("/sapi/").to_string(),
        token,
        body: String::from_utf8(body).unwrap(),
    }
}

fn write_response(mut stream: TcpStream, status: u16, body: &str) {
    let reason = if status == 200 { "OK" } else { "Error" };
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .unwrap();
    stream.flush().unwrap();
}

fn config(endpoint: &str, max_wait: Duration) -> SapiConfig {
    SapiConfig::new(TOKEN)
        .with_endpoint(endpoint)
        .with_polling(Duration::from_millis(5), Some(max_wait))
}

/// Three qubits on a line, so the chain can only land as 0-1-2.
fn line_solver(id: &str, status: &str, category: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "avg_load": 0.25,
        "properties": {
            "qubits": [0, 1, 2],
            "couplers": [[0, 1], [1, 2]],
            "num_qubits": 3,
            "category": category,
        }
    })
}

fn b64<T: Copy, const N: usize>(values: &[T], to_bytes: fn(T) -> [u8; N]) -> String {
    let bytes: Vec<u8> = values.iter().flat_map(|&v| to_bytes(v)).collect();
    STANDARD.encode(bytes)
}

fn completed(id: &str) -> Value {
    json!({
        "id": id,
        "status": "COMPLETED",
        "answer": {
            "format": "qp",
            "num_variables": 3,
            "active_variables": b64(&[0i32, 1, 2], i32::to_le_bytes),
            "energies": b64(&[-2.0f64, -2.0], f64::to_le_bytes),
            "num_occurrences": b64(&[3i32, 2], i32::to_le_bytes),
            "solutions": STANDARD.encode([0xA0u8, 0x40]),
            "timing": { "qpu_access_time": 15000 },
        }
    })
}

fn status(id: &str, state: &str) -> String {
    json!({ "id": id, "status": state }).to_string()
}

fn chain() -> (FieldSpec, CouplingSpec) {
    let h: FieldSpec = (0..3).map(|v| (v, 0.0)).collect();
    let j: CouplingSpec = [((0, 1), 1.0), ((1, 2), 1.0)].into_iter().collect();
    (h, j)
}

/// Lists solvers and answers problem polls through `poll`.
fn sapi<P>(poll: P) -> (String, Log)
where
    P: Fn(usize) -> String + Send + 'static,
{
    let polls = AtomicUsize::new(0);
    serve(move |request| {
        match (request.method.as_str(), request.path.as_str()) {
            ("GET", "solvers/remote/") => {
                let solvers = json!([
                    line_solver("offline_qpu", "OFFLINE", "qpu"),
                    line_solver("hybrid_v1", "ONLINE", "hybrid"),
                    line_solver("Advantage_test", "ONLINE", "qpu"),
                ]);
                (200, solvers.to_string())
            }
            ("POST", "problems/") => (200, format!("[{}]", status("p1", "PENDING"))),
            ("GET", "problems/p1/") => (200, poll(polls.fetch_add(1, Ordering::SeqCst))),
            _ => (404, json!({ "error_msg": "not found" }).to_string()),
        }
    })
}

#[test]
fn listing_sends_the_token_and_parses_solvers() {
    let (endpoint, log) = sapi(|_| status("p1", "PENDING"));
    let client = SapiClient::new(&config(&endpoint, Duration::from_secs(5))).unwrap();
    let solvers = client.list_solvers().unwrap();

    assert_eq!(solvers.len(), 3);
    assert!(!solvers[0].is_online());
    assert!(!solvers[1].is_qpu());
    assert_eq!(solvers[2].properties.couplers, vec![[0, 1], [1, 2]]);
    assert_eq!(log.lock().unwrap()[0].token.as_deref(), Some(TOKEN));
}

#[test]
fn connect_picks_the_first_online_qpu() {
    let (endpoint, _log) = sapi(|_| status("p1", "PENDING"));
    let sampler = DWaveSampler::connect(&config(&endpoint, Duration::from_secs(5))).unwrap();
    assert_eq!(sampler.solver().id, "Advantage_test");
}

#[test]
fn completed_answer_comes_back_through_the_composite() {
    let (endpoint, log) = sapi(|poll| match poll {
        0 => status("p1", "IN_PROGRESS"),
        _ => completed("p1").to_string(),
    });
    let solver = DWaveSampler::connect(&config(&endpoint, Duration::from_secs(5))).unwrap();
    let composite = EmbeddingComposite::new(solver);
    let (h, j) = chain();
    let set = composite
        .sample_ising(&h, &j, &SampleParams::reads(5).with_label("ising-sim"))
        .unwrap();

    assert_eq!(set.variables(), &[0, 1, 2]);
    assert_eq!(set.records()[0].sample, vec![1, -1, 1]);
    assert_eq!(set.records()[0].num_occurrences, 3);
    assert_eq!(set.records()[1].sample, vec![-1, 1, -1]);
    assert_eq!(set.records()[1].num_occurrences, 2);
    assert!(set.records().iter().all(|r| r.energy == -2.0));
    assert_eq!(set.info()["problem_id"], "p1");
    assert_eq!(set.info()["solver"], "Advantage_test");
    assert_eq!(set.info()["timing"]["qpu_access_time"], 15000);

    let log = log.lock().unwrap();
    let post = log.iter().find(|r| r.method == "POST").unwrap();
    let body: Value = serde_json::from_str(&post.body).unwrap();
    let problem = &body[0];
    assert_eq!(problem["solver"], "Advantage_test");
    assert_eq!(problem["type"], "ising");
    assert_eq!(problem["label"], "ising-sim");
    assert_eq!(problem["params"], json!({ "num_reads": 5, "auto_scale": true }));
    assert_eq!(problem["data"]["format"], "qp");
    assert_eq!(log.iter().filter(|r| r.path == "problems/p1/").count(), 2);
}

#[test]
fn failed_problem_is_a_remote_error() {
    let (endpoint, _log) = sapi(|_| {
        json!({ "id": "p1", "status": "FAILED", "error_message": "bias out of range" }).to_string()
    });
    let solver = DWaveSampler::connect(&config(&endpoint, Duration::from_secs(5))).unwrap();
    let (h, j) = chain();
    let err = EmbeddingComposite::new(solver)
        .sample_ising(&h, &j, &SampleParams::reads(5))
        .unwrap_err();
    assert_eq!(err.info().code, "problem-failed");
    assert_eq!(err.info().context["error_message"], "bias out of range");
}

#[test]
fn cancelled_problem_is_a_remote_error() {
    let (endpoint, _log) = sapi(|_| status("p1", "CANCELLED"));
    let solver = DWaveSampler::connect(&config(&endpoint, Duration::from_secs(5))).unwrap();
    let (h, j) = chain();
    let err = EmbeddingComposite::new(solver)
        .sample_ising(&h, &j, &SampleParams::reads(5))
        .unwrap_err();
    assert_eq!(err.info().code, "problem-failed");
}

#[test]
fn polling_stops_at_the_wait_bound() {
    let (endpoint, _log) = sapi(|_| status("p1", "PENDING"));
    let solver = DWaveSampler::connect(&config(&endpoint, Duration::from_millis(40))).unwrap();
    let (h, j) = chain();
    let err = EmbeddingComposite::new(solver)
        .sample_ising(&h, &j, &SampleParams::reads(5))
        .unwrap_err();
    assert_eq!(err.info().code, "wait-exceeded");
    assert_eq!(err.info().context["problem_id"], "p1");
}

#[test]
fn rejected_token_carries_status_and_hint() {
    let (endpoint, _log) = serve(|_| (401, json!({ "error_msg": "Invalid token" }).to_string()));
    let err = SapiClient::new(&config(&endpoint, Duration::from_secs(5)))
        .unwrap()
        .list_solvers()
        .unwrap_err();
    assert_eq!(err.info().code, "http-status");
    assert_eq!(err.info().context["status"], "401");
    assert!(err.info().context["body"].contains("Invalid token"));
    assert!(err.info().hint.is_some());
}
