//! Listing operations
//!
//! Supports: ListBuckets, ListObjects, ListObjectVersions, ListMultipartUploads, ListParts
//!
//! # Overview
//!
//! Each operation has a request record, a result record and a cursor
//! descriptor telling the [`Paginator`](crate::pagination::Paginator) which
//! fields carry the continuation token. Issuing the actual call (signing,
//! encoding, decoding) is left to the caller's fetch function.

mod cursors;
mod types;

pub use cursors::{
    ListBucketsCursor, ListMultipartUploadsCursor, ListObjectVersionsCursor, ListObjectsCursor,
    ListPartsCursor,
};
pub use types::{
    BucketSummary, ListBucketsRequest, ListBucketsResult, ListMultipartUploadsRequest,
    ListMultipartUploadsResult, ListObjectVersionsRequest, ListObjectVersionsResult,
    ListObjectsRequest, ListObjectsResult, ListPartsRequest, ListPartsResult, MultipartUpload,
    ObjectSummary, ObjectVersion, Part,
};
