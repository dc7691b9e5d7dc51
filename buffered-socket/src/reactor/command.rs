use super::Token;

/// A request sent to the event loop through a [`ReactorHandle`].
///
/// Interest commands are applied after the handler that sent them returns
/// and before the next poll.
///
/// [`ReactorHandle`]: super::ReactorHandle
#[derive(Debug)]
pub(crate) enum Command {
    WatchRead(Token),
    WatchWrite(Token),
    UnwatchWrite(Token),
    Deregister(Token),
    Shutdown,
}
