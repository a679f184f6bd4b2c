//! Response bodies handed out by the cache.
//!
//! ## Body States
//!
//! - **Complete**: the body came from the store, or was synthesized, and is
//!   already in memory.
//! - **Capture**: the body streams from the origin while a copy is buffered;
//!   the copy is persisted only if the stream was read to the end.
//! - **Passthrough**: the body streams from the origin untouched.
//!
//! A captured body is persisted when the [`CaptureBody`] is dropped, and only
//! if end of data was observed before that. Dropping it early, or an error
//! from the origin stream, leaves the store untouched.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes, BytesMut};
use http_body::{Body as HttpBody, Frame, SizeHint};
use pin_project::{pin_project, pinned_drop};

/// One-shot callback receiving the complete captured body.
pub type OnComplete = Box<dyn FnOnce(Bytes) + Send + Sync>;

/// A body that copies every data frame it yields into a buffer.
///
/// Data frames are forwarded unchanged. Trailers are forwarded but not
/// buffered. End of data is observed when the inner body yields `None`, or
/// when it reports [`is_end_stream`](HttpBody::is_end_stream) right after a
/// data frame. Once observed it stays observed.
///
/// On drop the inner body is released first; then, if end of data was
/// observed, the callback runs once with the buffered bytes.
#[pin_project(PinnedDrop)]
pub struct CaptureBody<B> {
    #[pin]
    inner: Option<B>,
    buffer: BytesMut,
    eof: bool,
    on_complete: Option<OnComplete>,
}

impl<B> CaptureBody<B> {
    pub fn new(inner: B, on_complete: OnComplete) -> Self {
        Self {
            inner: Some(inner),
            buffer: BytesMut::new(),
            eof: false,
            on_complete: Some(on_complete),
        }
    }

    /// Bytes buffered so far.
    pub fn captured(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns `true` once the inner body has signalled end of data.
    pub fn is_complete(&self) -> bool {
        self.eof
    }
}

impl<B> fmt::Debug for CaptureBody<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureBody")
            .field("captured", &self.buffer.len())
            .field("eof", &self.eof)
            .field("pending_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl<B> HttpBody for CaptureBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let mut this = self.project();
        let inner = match this.inner.as_mut().as_pin_mut() {
            Some(inner) => inner,
            None => return Poll::Ready(None),
        };

        match inner.poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                if let Some(data) = frame.data_ref() {
                    this.buffer.extend_from_slice(data);
                    if this.inner.as_ref().as_pin_ref().is_some_and(|inner| inner.is_end_stream()) {
                        *this.eof = true;
                    }
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(Some(Err(error))) => Poll::Ready(Some(Err(error))),
            Poll::Ready(None) => {
                *this.eof = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            Some(inner) => inner.size_hint(),
            None => SizeHint::with_exact(0),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.inner {
            Some(inner) => inner.is_end_stream(),
            None => true,
        }
    }
}

#[pinned_drop]
impl<B> PinnedDrop for CaptureBody<B> {
    fn drop(self: Pin<&mut Self>) {
        let mut this = self.project();
        this.inner.set(None);
        if !*this.eof {
            return;
        }
        if let Some(on_complete) = this.on_complete.take() {
            let captured = std::mem::take(this.buffer).freeze();
            on_complete(captured);
        }
    }
}

/// Body of a response returned by the cache.
#[pin_project(project = CacheBodyProj)]
pub enum CacheBody<B> {
    /// Body already held in memory, yielded once. `None` is an empty body.
    Complete(Option<Bytes>),

    /// Origin body being captured for storage.
    Capture(#[pin] CaptureBody<B>),

    /// Origin body forwarded as is.
    Passthrough(#[pin] B),
}

impl<B> CacheBody<B> {
    pub fn capture(inner: B, on_complete: OnComplete) -> Self {
        CacheBody::Capture(CaptureBody::new(inner, on_complete))
    }
}

impl<B> fmt::Debug for CacheBody<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBody::Complete(bytes) => f.debug_tuple("Complete").field(bytes).finish(),
            CacheBody::Capture(capture) => f.debug_tuple("Capture").field(capture).finish(),
            CacheBody::Passthrough(_) => f.write_str("Passthrough"),
        }
    }
}

impl<B> HttpBody for CacheBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            CacheBodyProj::Complete(data) => match data.take() {
                Some(bytes) if !bytes.is_empty() => Poll::Ready(Some(Ok(Frame::data(bytes)))),
                _ => Poll::Ready(None),
            },
            CacheBodyProj::Capture(capture) => capture.poll_frame(cx),
            CacheBodyProj::Passthrough(body) => match body.poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(error))) => Poll::Ready(Some(Err(error))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            CacheBody::Complete(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            CacheBody::Complete(None) => SizeHint::with_exact(0),
            CacheBody::Capture(capture) => capture.size_hint(),
            CacheBody::Passthrough(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            CacheBody::Complete(Some(bytes)) => bytes.is_empty(),
            CacheBody::Complete(None) => true,
            CacheBody::Capture(capture) => capture.is_end_stream(),
            CacheBody::Passthrough(body) => body.is_end_stream(),
        }
    }
}
