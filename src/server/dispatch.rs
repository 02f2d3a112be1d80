//! Request dispatch: the complete decision table mapping one request plus
//! the content store to exactly one response.
//!
//! Two deliberate quirks of the wire contract are preserved here:
//! - a successful delete answers with the save-success status (212), and
//! - a file that exists but cannot be read answers no-such-file, not
//!   general-error.

use tracing::warn;

use crate::protocol::{Filename, Payload, Request, Response};
use crate::store::ContentStore;

/// Length of the synthetic filename carried by a listing response.
pub const LISTING_NAME_LEN: usize = 32;

/// Source of synthetic listing names, injected so tests can substitute a
/// deterministic one.
pub trait NameGenerator: Send + Sync + 'static {
    fn listing_name(&self) -> String;
}

/// Uniform random names over the 62-character alphanumeric alphabet.
pub struct AlphanumericNames;

impl NameGenerator for AlphanumericNames {
    fn listing_name(&self) -> String {
        use rand::Rng;
        const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
        let mut rng = rand::rng();
        (0..LISTING_NAME_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// True when the client's namespace is absent or holds no entries, which the
/// protocol reports as no-such-client.
async fn client_missing<S: ContentStore + ?Sized>(
    store: &S,
    client_id: u32,
) -> std::io::Result<bool> {
    Ok(!store.namespace_exists(client_id).await? || store.namespace_is_empty(client_id).await?)
}

pub async fn dispatch<S, N>(request: Request, store: &S, names: &N) -> Response
where
    S: ContentStore + ?Sized,
    N: NameGenerator + ?Sized,
{
    match request {
        Request::Save {
            client_id,
            filename,
            payload,
            ..
        } => save(store, client_id, filename, payload).await,
        Request::Restore {
            client_id,
            filename,
            ..
        } => restore(store, client_id, filename).await,
        Request::Delete {
            client_id,
            filename,
            ..
        } => delete(store, client_id, filename).await,
        Request::List { client_id, .. } => list(store, names, client_id).await,
    }
}

async fn save<S: ContentStore + ?Sized>(
    store: &S,
    client_id: u32,
    filename: Filename,
    payload: Payload,
) -> Response {
    // Save is the one operation allowed to materialize a namespace.
    if let Err(err) = store.ensure_namespace(client_id).await {
        warn!(client_id, %filename, "failed to create client namespace: {err}");
        return Response::GeneralError;
    }
    match store.put(client_id, filename.as_str(), payload.as_bytes()).await {
        Ok(()) => Response::SaveOk { filename },
        Err(err) => {
            warn!(client_id, %filename, "failed to store file: {err}");
            Response::GeneralError
        }
    }
}

async fn restore<S: ContentStore + ?Sized>(
    store: &S,
    client_id: u32,
    filename: Filename,
) -> Response {
    match client_missing(store, client_id).await {
        Ok(true) => return Response::NoSuchClient,
        Ok(false) => {}
        Err(err) => {
            warn!(client_id, "failed to inspect client namespace: {err}");
            return Response::GeneralError;
        }
    }
    match store.contains(client_id, filename.as_str()).await {
        Ok(true) => {}
        Ok(false) => return Response::NoSuchFile { filename },
        Err(err) => {
            warn!(client_id, %filename, "failed to check file existence: {err}");
            return Response::GeneralError;
        }
    }
    // Unreadable is reported the same as absent.
    let Ok(content) = store.get(client_id, filename.as_str()).await else {
        return Response::NoSuchFile { filename };
    };
    match Payload::from_bytes(content) {
        Ok(payload) => Response::RestoreOk { filename, payload },
        Err(_) => Response::NoSuchFile { filename },
    }
}

async fn delete<S: ContentStore + ?Sized>(
    store: &S,
    client_id: u32,
    filename: Filename,
) -> Response {
    match client_missing(store, client_id).await {
        Ok(true) => return Response::NoSuchClient,
        Ok(false) => {}
        Err(err) => {
            warn!(client_id, "failed to inspect client namespace: {err}");
            return Response::GeneralError;
        }
    }
    match store.contains(client_id, filename.as_str()).await {
        Ok(true) => {}
        Ok(false) => return Response::NoSuchFile { filename },
        Err(err) => {
            warn!(client_id, %filename, "failed to check file existence: {err}");
            return Response::GeneralError;
        }
    }
    match store.remove(client_id, filename.as_str()).await {
        // Delete reuses the save-success status on the wire.
        Ok(()) => Response::SaveOk { filename },
        Err(err) => {
            warn!(client_id, %filename, "failed to delete file: {err}");
            Response::GeneralError
        }
    }
}

async fn list<S, N>(store: &S, names: &N, client_id: u32) -> Response
where
    S: ContentStore + ?Sized,
    N: NameGenerator + ?Sized,
{
    match client_missing(store, client_id).await {
        Ok(true) => return Response::NoSuchClient,
        Ok(false) => {}
        Err(err) => {
            warn!(client_id, "failed to inspect client namespace: {err}");
            return Response::GeneralError;
        }
    }

    let entries = match store.list_names(client_id).await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(client_id, "failed to enumerate client files: {err}");
            return Response::GeneralError;
        }
    };

    let mut joined = Vec::new();
    for name in &entries {
        joined.extend_from_slice(name.as_bytes());
        joined.push(b'\n');
    }
    let Ok(payload) = Payload::from_bytes(joined) else {
        return Response::GeneralError;
    };

    let Ok(filename) = Filename::new(names.listing_name()) else {
        return Response::GeneralError;
    };

    Response::ListOk { filename, payload }
}
