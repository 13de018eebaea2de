//! Cursor descriptors for the paged listing operations
//!
//! Each descriptor maps the request's cursor fields to the result's mirrored
//! `next_*` fields. Multi-field cursors travel as tuples so both halves are
//! always copied together.

use super::types::{
    ListBucketsRequest, ListBucketsResult, ListMultipartUploadsRequest,
    ListMultipartUploadsResult, ListObjectVersionsRequest, ListObjectVersionsResult,
    ListObjectsRequest, ListObjectsResult, ListPartsRequest, ListPartsResult,
};
use crate::pagination::CursorDescriptor;

/// `marker` → `next_marker`
#[derive(Debug, Clone, Copy, Default)]
pub struct ListBucketsCursor;

impl CursorDescriptor for ListBucketsCursor {
    type Request = ListBucketsRequest;
    type Result = ListBucketsResult;
    type Cursor = Option<String>;

    fn name(&self) -> &'static str {
        "ListBuckets"
    }

    fn cursor(&self, request: &ListBucketsRequest) -> Option<String> {
        request.marker.clone()
    }

    fn set_cursor(&self, request: &mut ListBucketsRequest, marker: Option<String>) {
        request.marker = marker;
    }

    fn next_cursor(&self, result: &ListBucketsResult) -> Option<String> {
        result.next_marker.clone()
    }

    fn is_truncated(&self, result: &ListBucketsResult) -> Option<bool> {
        result.is_truncated
    }

    fn set_page_size(&self, request: &mut ListBucketsRequest, limit: u32) {
        request.max_buckets = Some(limit);
    }
}

/// `marker` → `next_marker`
#[derive(Debug, Clone, Copy, Default)]
pub struct ListObjectsCursor;

impl CursorDescriptor for ListObjectsCursor {
    type Request = ListObjectsRequest;
    type Result = ListObjectsResult;
    type Cursor = Option<String>;

    fn name(&self) -> &'static str {
        "ListObjects"
    }

    fn cursor(&self, request: &ListObjectsRequest) -> Option<String> {
        request.marker.clone()
    }

    fn set_cursor(&self, request: &mut ListObjectsRequest, marker: Option<String>) {
        request.marker = marker;
    }

    fn next_cursor(&self, result: &ListObjectsResult) -> Option<String> {
        result.next_marker.clone()
    }

    fn is_truncated(&self, result: &ListObjectsResult) -> Option<bool> {
        result.is_truncated
    }

    fn set_page_size(&self, request: &mut ListObjectsRequest, limit: u32) {
        request.max_keys = Some(limit);
    }
}

/// (`key_marker`, `version_id_marker`) → (`next_key_marker`, `next_version_id_marker`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ListObjectVersionsCursor;

impl CursorDescriptor for ListObjectVersionsCursor {
    type Request = ListObjectVersionsRequest;
    type Result = ListObjectVersionsResult;
    type Cursor = (Option<String>, Option<String>);

    fn name(&self) -> &'static str {
        "ListObjectVersions"
    }

    fn cursor(&self, request: &ListObjectVersionsRequest) -> Self::Cursor {
        (request.key_marker.clone(), request.version_id_marker.clone())
    }

    fn set_cursor(&self, request: &mut ListObjectVersionsRequest, cursor: Self::Cursor) {
        (request.key_marker, request.version_id_marker) = cursor;
    }

    fn next_cursor(&self, result: &ListObjectVersionsResult) -> Self::Cursor {
        (
            result.next_key_marker.clone(),
            result.next_version_id_marker.clone(),
        )
    }

    fn is_truncated(&self, result: &ListObjectVersionsResult) -> Option<bool> {
        result.is_truncated
    }

    fn set_page_size(&self, request: &mut ListObjectVersionsRequest, limit: u32) {
        request.max_keys = Some(limit);
    }
}

/// (`key_marker`, `upload_id_marker`) → (`next_key_marker`, `next_upload_id_marker`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ListMultipartUploadsCursor;

impl CursorDescriptor for ListMultipartUploadsCursor {
    type Request = ListMultipartUploadsRequest;
    type Result = ListMultipartUploadsResult;
    type Cursor = (Option<String>, Option<String>);

    fn name(&self) -> &'static str {
        "ListMultipartUploads"
    }

    fn cursor(&self, request: &ListMultipartUploadsRequest) -> Self::Cursor {
        (request.key_marker.clone(), request.upload_id_marker.clone())
    }

    fn set_cursor(&self, request: &mut ListMultipartUploadsRequest, cursor: Self::Cursor) {
        (request.key_marker, request.upload_id_marker) = cursor;
    }

    fn next_cursor(&self, result: &ListMultipartUploadsResult) -> Self::Cursor {
        (
            result.next_key_marker.clone(),
            result.next_upload_id_marker.clone(),
        )
    }

    fn is_truncated(&self, result: &ListMultipartUploadsResult) -> Option<bool> {
        result.is_truncated
    }

    fn set_page_size(&self, request: &mut ListMultipartUploadsRequest, limit: u32) {
        request.max_uploads = Some(limit);
    }
}

/// `part_number_marker` → `next_part_number_marker`
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPartsCursor;

impl CursorDescriptor for ListPartsCursor {
    type Request = ListPartsRequest;
    type Result = ListPartsResult;
    type Cursor = Option<String>;

    fn name(&self) -> &'static str {
        "ListParts"
    }

    fn cursor(&self, request: &ListPartsRequest) -> Option<String> {
        request.part_number_marker.clone()
    }

    fn set_cursor(&self, request: &mut ListPartsRequest, marker: Option<String>) {
        request.part_number_marker = marker;
    }

    fn next_cursor(&self, result: &ListPartsResult) -> Option<String> {
        result.next_part_number_marker.clone()
    }

    fn is_truncated(&self, result: &ListPartsResult) -> Option<bool> {
        result.is_truncated
    }

    fn set_page_size(&self, request: &mut ListPartsRequest, limit: u32) {
        request.max_parts = Some(limit);
    }
}
