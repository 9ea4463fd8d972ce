//! Error taxonomy for the tree family.
//!
//! `get`/`remove` report absence through `Option`/`bool`, not through this
//! type — only genuine misuse or a poisoned cursor surfaces as an `Error`.

error_chain::error_chain! {
    errors {
        /// An empty key, or an absent value, passed to a mutator that requires one.
        InvalidArgument(msg: String) {
            description("invalid argument")
            display("invalid argument: {}", msg)
        }
        /// A cursor's `remove` was called; traversal cursors are read-only.
        UnsupportedOperation(msg: String) {
            description("unsupported operation")
            display("unsupported operation: {}", msg)
        }
        /// A cursor was advanced past the end of its data.
        NoSuchElement {
            description("no such element")
            display("no such element")
        }
        /// A cursor was polled again after its producer had already faulted.
        IllegalState {
            description("illegal state")
            display("illegal state: cursor is poisoned")
        }
    }

    foreign_links {
        // An exception raised by a user-supplied NodeFactory or set hook, propagated unchanged.
        ProducerFault(Box<dyn std::error::Error + Send + Sync>);
    }
}
