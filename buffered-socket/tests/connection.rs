mod common;

use buffered_socket::{
    Connection, ConnectionBuilder, Error, InputStatus, OutputStatus, State, Token,
};
use common::{FakeReactor, FakeTransport, Hook, Interest, RecvStep, Recorder, SendStep, payload};

const TOKEN: Token = Token(7);

type TestConnection = Connection<FakeTransport, FakeReactor, Recorder>;

fn opened(protocol: Recorder) -> (TestConnection, FakeTransport, FakeReactor) {
    let transport = FakeTransport::new();
    let reactor = FakeReactor::default();

    let mut connection = Connection::new(TOKEN, reactor.clone(), protocol);
    connection
        .open(transport.clone())
        .expect("open should succeed");

    (connection, transport, reactor)
}

#[test]
fn test_open_registers_read_interest() {
    let (connection, _transport, reactor) = opened(Recorder::default());

    assert_eq!(connection.state(), State::Open);
    assert_eq!(connection.remote_address(), "10.0.0.7");
    assert_eq!(reactor.calls(), vec![Interest::Read(TOKEN)]);
    assert_eq!(connection.protocol().hooks(), vec![Hook::Accept]);
}

#[test]
fn test_remote_address_is_unknown_before_open() {
    let connection: TestConnection =
        Connection::new(TOKEN, FakeReactor::default(), Recorder::default());

    assert_eq!(connection.state(), State::Accepted);
    assert_eq!(connection.remote_address(), "<unknown>");
}

#[test]
fn test_open_fails_without_remote_address() {
    let transport = FakeTransport::new();
    transport.wire().address = None;
    let reactor = FakeReactor::default();

    let mut connection = Connection::new(TOKEN, reactor.clone(), Recorder::default());
    let result = connection.open(transport.clone());

    assert!(matches!(result, Err(Error::AddressUnavailable(_))));
    assert_eq!(connection.state(), State::Closed);
    assert!(transport.wire().dropped, "transport should be released");
    assert!(reactor.calls().is_empty(), "nothing should be registered");
    assert!(connection.protocol().hooks().is_empty());
}

#[test]
fn test_open_twice_is_rejected() {
    let (mut connection, _transport, _reactor) = opened(Recorder::default());

    let result = connection.open(FakeTransport::new());

    assert!(matches!(result, Err(Error::AlreadyOpen)));
    assert_eq!(connection.state(), State::Open);
}

#[test]
fn test_close_from_on_accept_aborts_open() {
    let protocol = Recorder {
        close_on_accept: true,
        ..Recorder::default()
    };
    let transport = FakeTransport::new();
    let reactor = FakeReactor::default();

    let mut connection = Connection::new(TOKEN, reactor.clone(), protocol);
    let result = connection.open(transport.clone());

    assert!(matches!(result, Err(Error::Closed)));
    assert_eq!(connection.state(), State::Closed);
    assert_eq!(reactor.count(Interest::Read(TOKEN)), 0);
    assert_eq!(reactor.count(Interest::Deregister(TOKEN)), 1);
    assert!(transport.wire().dropped);
}

#[test]
fn test_exact_fill_reports_more_pending() {
    let protocol = Recorder {
        consume: Some(4086),
        ..Recorder::default()
    };
    let (mut connection, transport, _reactor) = opened(protocol);
    transport
        .wire()
        .inbound
        .push_back(RecvStep::Data(payload(5000)));

    assert_eq!(connection.handle_input(), InputStatus::MorePending);
    assert_eq!(transport.wire().last_recv_len, 4096);
    assert_eq!(connection.recv_len(), 10);

    // The 10 unread bytes were compacted to the front.
    assert_eq!(connection.channel().received(), &payload(4096)[4086..]);

    // The next read is bounded by the compacted free space.
    assert_eq!(connection.handle_input(), InputStatus::Drained);
    assert_eq!(transport.wire().last_recv_len, 4086);
}

#[test]
fn test_short_read_reports_drained() {
    let (mut connection, transport, _reactor) = opened(Recorder::default());
    transport
        .wire()
        .inbound
        .push_back(RecvStep::Data(b"hello".to_vec()));

    assert_eq!(connection.handle_input(), InputStatus::Drained);
    assert_eq!(*connection.protocol().received.borrow(), b"hello");
    assert_eq!(connection.recv_len(), 0);
}

#[test]
fn test_would_block_changes_nothing() {
    let (mut connection, transport, reactor) = opened(Recorder::default());
    transport.wire().inbound.push_back(RecvStep::WouldBlock);

    assert_eq!(connection.handle_input(), InputStatus::WouldBlock);
    assert_eq!(connection.state(), State::Open);
    assert_eq!(reactor.calls(), vec![Interest::Read(TOKEN)]);
    assert_eq!(connection.protocol().hooks(), vec![Hook::Accept]);
}

#[test]
fn test_interrupted_read_is_retried_later() {
    let (mut connection, transport, _reactor) = opened(Recorder::default());
    transport
        .wire()
        .inbound
        .push_back(RecvStep::Fail(std::io::ErrorKind::Interrupted));

    assert_eq!(connection.handle_input(), InputStatus::WouldBlock);
    assert_eq!(connection.state(), State::Open);
}

#[test]
fn test_eof_requests_close() {
    let (mut connection, transport, reactor) = opened(Recorder::default());
    transport.wire().inbound.push_back(RecvStep::Eof);

    assert_eq!(connection.handle_input(), InputStatus::Close);
    assert_eq!(connection.state(), State::Open, "the reactor closes, not input");

    connection.handle_close();

    assert_eq!(connection.state(), State::Closed);
    assert_eq!(
        connection.protocol().hooks(),
        vec![Hook::Accept, Hook::Close]
    );
    assert_eq!(reactor.count(Interest::Deregister(TOKEN)), 1);
    assert_eq!(transport.wire().close_read_calls, 1);
    assert_eq!(transport.wire().close_write_calls, 1);
}

#[test]
fn test_read_error_requests_close() {
    let (mut connection, transport, _reactor) = opened(Recorder::default());
    transport
        .wire()
        .inbound
        .push_back(RecvStep::Fail(std::io::ErrorKind::ConnectionReset));

    assert_eq!(connection.handle_input(), InputStatus::Close);
}

#[test]
fn test_undrained_full_buffer_requests_close() {
    let protocol = Recorder {
        consume: Some(0),
        ..Recorder::default()
    };
    let transport = FakeTransport::new();
    let mut connection = ConnectionBuilder::new().receive_buffer(8).build(
        TOKEN,
        FakeReactor::default(),
        protocol,
    );
    connection.open(transport.clone()).unwrap();
    transport
        .wire()
        .inbound
        .push_back(RecvStep::Data(payload(16)));

    assert_eq!(connection.handle_input(), InputStatus::MorePending);
    assert_eq!(connection.recv_len(), 8);

    let calls = transport.wire().recv_calls;
    assert_eq!(connection.handle_input(), InputStatus::Close);
    assert_eq!(transport.wire().recv_calls, calls, "no read into a full buffer");
}

#[test]
fn test_close_from_on_read_requests_close() {
    let protocol = Recorder {
        close_on_read: true,
        ..Recorder::default()
    };
    let (mut connection, transport, _reactor) = opened(protocol);
    transport
        .wire()
        .inbound
        .push_back(RecvStep::Data(b"bye".to_vec()));

    assert_eq!(connection.handle_input(), InputStatus::Close);
    assert_eq!(connection.state(), State::Closed);

    // Already closed: the reactor's close does not reach the protocol.
    connection.handle_close();
    assert_eq!(
        connection.protocol().hooks(),
        vec![Hook::Accept, Hook::Read]
    );
}

#[test]
fn test_inline_send_writes_everything() {
    let (mut connection, transport, reactor) = opened(Recorder::default());

    connection.send(b"ping").unwrap();

    assert_eq!(transport.wire().written, b"ping");
    assert_eq!(connection.channel().pending_output(), 0);
    assert_eq!(reactor.count(Interest::Write(TOKEN)), 0);
}

#[test]
fn test_partial_send_queues_the_rest() {
    let (mut connection, transport, reactor) = opened(Recorder::default());
    let data = payload(3000);

    transport.wire().plan.push_back(SendStep::Accept(1000));
    connection.send(&data).unwrap();

    assert_eq!(transport.wire().written.len(), 1000);
    assert_eq!(connection.channel().pending_output(), 2000);
    assert_eq!(reactor.count(Interest::Write(TOKEN)), 1);

    transport.wire().plan.push_back(SendStep::Accept(800));
    assert_eq!(connection.handle_output(), OutputStatus::Partial);
    assert_eq!(connection.channel().pending_output(), 1200);

    assert_eq!(connection.handle_output(), OutputStatus::Flushed);
    assert_eq!(connection.channel().pending_output(), 0);
    assert_eq!(reactor.count(Interest::CancelWrite(TOKEN)), 0);

    assert_eq!(connection.handle_output(), OutputStatus::Idle);
    assert_eq!(reactor.count(Interest::CancelWrite(TOKEN)), 1);

    assert_eq!(transport.wire().written, data);
}

#[test]
fn test_would_block_send_queues_everything() {
    let (mut connection, transport, reactor) = opened(Recorder::default());

    transport.wire().plan.push_back(SendStep::WouldBlock);
    connection.send(b"later").unwrap();

    assert!(transport.wire().written.is_empty());
    assert_eq!(connection.channel().pending_output(), 5);
    assert_eq!(reactor.count(Interest::Write(TOKEN)), 1);
}

#[test]
fn test_send_behind_queued_output_skips_transport() {
    let (mut connection, transport, reactor) = opened(Recorder::default());

    transport.wire().plan.push_back(SendStep::Accept(2));
    connection.send(b"first").unwrap();
    let calls = transport.wire().send_calls;

    connection.send(b"second").unwrap();

    assert_eq!(transport.wire().send_calls, calls);
    assert_eq!(connection.channel().pending_output(), 3 + 6);
    assert_eq!(reactor.count(Interest::Write(TOKEN)), 1, "registered once");

    while connection.handle_output() == OutputStatus::Flushed {}

    assert_eq!(transport.wire().written, b"firstsecond");
}

#[test]
fn test_fatal_send_error_is_returned() {
    let (mut connection, transport, _reactor) = opened(Recorder::default());

    transport
        .wire()
        .plan
        .push_back(SendStep::Fail(std::io::ErrorKind::BrokenPipe));

    let result = connection.send(b"data");

    assert!(matches!(result, Err(Error::Io(_))));
    assert_eq!(connection.channel().pending_output(), 0);
}

#[test]
fn test_zero_byte_send_is_fatal() {
    let (mut connection, transport, _reactor) = opened(Recorder::default());

    transport.wire().plan.push_back(SendStep::Zero);

    assert!(matches!(connection.send(b"data"), Err(Error::ZeroWrite)));
}

#[test]
fn test_queued_send_error_requests_close() {
    let (mut connection, transport, _reactor) = opened(Recorder::default());

    transport.wire().plan.push_back(SendStep::WouldBlock);
    connection.send(b"data").unwrap();

    transport
        .wire()
        .plan
        .push_back(SendStep::Fail(std::io::ErrorKind::ConnectionReset));

    assert_eq!(connection.handle_output(), OutputStatus::Close);
}

#[test]
fn test_empty_send_is_a_no_op() {
    let (mut connection, transport, _reactor) = opened(Recorder::default());

    connection.send(&[]).unwrap();

    assert_eq!(transport.wire().send_calls, 0);
}

#[test]
fn test_send_before_open_or_after_close_fails() {
    let mut fresh: TestConnection =
        Connection::new(TOKEN, FakeReactor::default(), Recorder::default());
    assert!(matches!(fresh.send(b"x"), Err(Error::Closed)));

    let (mut connection, transport, _reactor) = opened(Recorder::default());
    connection.close_connection();

    assert!(matches!(connection.send(b"x"), Err(Error::Closed)));
    assert_eq!(transport.wire().send_calls, 0);
}

#[test]
fn test_close_is_idempotent() {
    let (mut connection, transport, reactor) = opened(Recorder::default());

    transport.wire().plan.push_back(SendStep::WouldBlock);
    connection.send(b"discarded").unwrap();

    connection.close_connection();
    connection.close_connection();
    connection.handle_close();

    assert_eq!(connection.state(), State::Closed);
    assert_eq!(connection.channel().pending_output(), 0);
    assert!(transport.wire().dropped);
    assert_eq!(transport.wire().close_read_calls, 1);
    assert_eq!(transport.wire().close_write_calls, 1);
    assert_eq!(reactor.count(Interest::Deregister(TOKEN)), 1);
    assert_eq!(connection.protocol().hooks(), vec![Hook::Accept]);
}

#[test]
fn test_recv_soft_does_not_consume() {
    let protocol = Recorder {
        consume: Some(0),
        ..Recorder::default()
    };
    let (mut connection, transport, _reactor) = opened(protocol);
    transport
        .wire()
        .inbound
        .push_back(RecvStep::Data(b"abcdef".to_vec()));
    connection.handle_input();

    let mut head = [0u8; 4];
    assert!(connection.recv_soft(&mut head));
    assert_eq!(&head, b"abcd");
    assert_eq!(connection.recv_len(), 6);

    let mut too_long = [0u8; 7];
    assert!(!connection.recv_soft(&mut too_long));
    assert!(!connection.recv(&mut too_long));
    assert_eq!(connection.recv_len(), 6);

    connection.recv_skip(2);

    let mut rest = [0u8; 4];
    assert!(connection.recv(&mut rest));
    assert_eq!(&rest, b"cdef");
    assert_eq!(connection.recv_len(), 0);
}

#[test]
#[should_panic]
fn test_recv_skip_past_available_panics() {
    let (mut connection, _transport, _reactor) = opened(Recorder::default());

    connection.recv_skip(1);
}
