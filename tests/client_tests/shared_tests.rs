//! Tests for SharedFetchClient

use std::sync::Arc;
use std::thread;

use urlfetch::protocol::{FetchRequest, NOT_FOUND};
use urlfetch::SharedFetchClient;

use crate::support::{fid_bytes, result_stream, scripted_client};

#[test]
fn test_concurrent_fetches_do_not_interleave() {
    const THREADS: usize = 8;

    let (connector, client) = scripted_client();
    for _ in 0..THREADS {
        connector
            .reply(fid_bytes(b'x'))
            .reply(result_stream(200, "", b"shared"));
    }

    let shared = Arc::new(SharedFetchClient::new(client));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                shared
                    .fetch(&FetchRequest::new(format!("http://host/{}", i)))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert_eq!(result.body, b"shared");
    }

    // Commands strictly alternate FETCH_ASYNC / GET_RESULT
    let commands = connector.commands();
    assert_eq!(commands.len(), THREADS * 2);
    for pair in commands.chunks(2) {
        assert!(pair[0].starts_with(b"\x0bFETCH_ASYNC"));
        assert!(pair[1].starts_with(b"\x0aGET_RESULT"));
    }
    assert_eq!(connector.connects(), 1);
}

#[test]
fn test_shared_close_and_state() {
    let (connector, client) = scripted_client();
    connector.reply(fid_bytes(b'y')).reply(NOT_FOUND);

    let shared: SharedFetchClient<_> = client.into();
    assert!(!shared.is_open());

    let fid = shared.start_fetch(&FetchRequest::new("http://x/")).unwrap();
    assert!(shared.is_open());
    assert!(shared.get_result(&fid, true).unwrap_err().is_download());

    shared.close().unwrap();
    assert!(!shared.is_open());

    let client = shared.into_inner();
    assert!(!client.is_open());
    assert_eq!(connector.shutdowns(), 1);
}

#[test]
fn test_lock_holds_connection_for_sequence() {
    let (connector, client) = scripted_client();
    connector
        .reply(fid_bytes(b'1'))
        .reply(fid_bytes(b'2'));

    let shared = SharedFetchClient::new(client);
    let (a, b) = {
        let mut guard = shared.lock();
        let a = guard.start_fetch(&FetchRequest::new("http://a/")).unwrap();
        let b = guard.start_fetch(&FetchRequest::new("http://b/")).unwrap();
        (a, b)
    };

    assert_eq!(a.as_bytes(), &fid_bytes(b'1')[..]);
    assert_eq!(b.as_bytes(), &fid_bytes(b'2')[..]);
}
