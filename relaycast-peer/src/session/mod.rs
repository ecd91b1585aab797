mod candidate_queue;
mod peer_session;
mod session_key;
mod session_worker;

pub use candidate_queue::CandidateQueue;
pub use peer_session::{PeerSession, SessionAction, SessionInput};
pub use session_key::SessionKey;
pub(crate) use session_worker::{SessionOp, SessionWorker};
