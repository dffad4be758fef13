//! Per-connection request loop

use std::sync::Arc;

use gotthard_core::{ClientId, TxnResult};
use gotthard_engine::Database;
use gotthard_wire::{
    decode_request, encode_hello, encode_response, read_frame, write_frame, Header, MAX_FRAME_LEN,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// Serve one client until it disconnects
///
/// Sends the hello frame carrying `client_id`, then answers every request
/// frame in arrival order. The client id in each request is replaced by
/// `client_id`. A frame whose header is readable but whose body is not gets
/// a BADREQ answer; anything less readable ends the connection with an
/// error. A result too large for one frame is answered with its header
/// alone.
pub async fn serve_connection<S>(
    mut stream: S,
    client_id: ClientId,
    db: Arc<Database>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    write_frame(&mut stream, &encode_hello(client_id)?).await?;
    info!(client_id = client_id.0, "Client connected");

    let mut served = 0u64;
    while let Some(body) = read_frame(&mut stream).await? {
        let result = answer(&body, client_id, &db)?;
        write_frame(&mut stream, &respond(&result)?).await?;
        served += 1;
    }

    info!(client_id = client_id.0, served, "Client disconnected");
    Ok(())
}

/// Encode `result`, dropping its operations if the full body cannot be sent
fn respond(result: &TxnResult) -> Result<Vec<u8>> {
    let problem = match encode_response(result) {
        Ok(body) if body.len() <= MAX_FRAME_LEN => return Ok(body),
        Ok(body) => format!("{} byte body exceeds the {} byte frame limit", body.len(), MAX_FRAME_LEN),
        Err(e) => e.to_string(),
    };
    error!(
        client_id = result.client_id.0,
        request_id = result.request_id.0,
        status = %result.status,
        ops = result.results.len(),
        problem = %problem,
        "Response not encodable, answering header only"
    );
    let header_only = TxnResult {
        results: Vec::new(),
        ..result.clone()
    };
    Ok(encode_response(&header_only)?)
}

fn answer(body: &[u8], client_id: ClientId, db: &Database) -> Result<TxnResult> {
    let mut request = match decode_request(body) {
        Ok(request) => request,
        Err(e) => {
            let Ok(header) = Header::peek(body) else {
                return Err(e.into());
            };
            warn!(
                client_id = client_id.0,
                request_id = header.request_id.0,
                error = %e,
                "Malformed request"
            );
            return Ok(TxnResult::bad_request(client_id, header.request_id));
        }
    };
    request.client_id = client_id;

    match db.execute(&request) {
        Ok(result) => {
            debug!(
                client_id = client_id.0,
                request_id = request.request_id.0,
                status = %result.status,
                ops = request.operations.len(),
                "Request served"
            );
            Ok(result)
        }
        Err(e) => {
            error!(
                client_id = client_id.0,
                request_id = request.request_id.0,
                error = %e,
                "Engine fault, answering BADREQ"
            );
            Ok(TxnResult::bad_request(client_id, request.request_id))
        }
    }
}
