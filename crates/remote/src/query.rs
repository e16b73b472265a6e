//! GraphQL query document and response decoding.
//!
//! The response schema belongs to the remote service and changes whenever it
//! likes. We only ever decode one field out of it (the revision hash, used as
//! the store key) and keep everything under `Data` as raw bytes for the
//! desktop application to interpret.

use crate::LayoutAddress;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

const OPERATION_NAME: &str = "getLayout";

const GET_LAYOUT_QUERY: &str = r#"
query getLayout($hashId: String!, $revisionId: String!, $geometry: String) {
	layout(hashId: $hashId, geometry: $geometry, revisionId: $revisionId) {
		...LayoutData
	}
}
fragment LayoutData on Layout {
	privacy
	geometry
	hashId
	parent {
		hashId
	}
	tags {
		id
		hashId
		name
	}
	title
	user {
		annotation
		annotationPublic
		name
		hashId
		pictureUrl
	}
	isDefault
	revision {
		...RevisionData
	}
	lastRevisionCompiled
	isLatestRevision
}
fragment RevisionData on Revision {
	createdAt
	hashId
	model
	title
	config
	swatch
	qmkVersion
	qmkUptodate
	hasDeletedLayers
	md5
	combos {
		keyIndices
		layerIdx
		name
		trigger
	}
	tour {
		...TourData
	}
	layers {
		builtIn
		hashId
		keys
		position
		title
		color
		prevHashId
	}
}
fragment TourData on Tour {
	hashId url steps: tourSteps {
		hashId intro outro position content keyIndex layer {
			hashId position
		}
	}
}
"#;

/// The `getLayout` request body sent to the query endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutQuery {
    operation_name: &'static str,
    variables: Variables,
    query: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables {
    hash_id: String,
    geometry: String,
    revision_id: String,
}

impl From<&LayoutAddress> for LayoutQuery {
    fn from(address: &LayoutAddress) -> Self {
        Self {
            operation_name: OPERATION_NAME,
            variables: Variables {
                hash_id: address.layout.clone(),
                geometry: address.geometry.clone(),
                revision_id: address.revision.clone(),
            },
            query: GET_LAYOUT_QUERY,
        }
    }
}

/// Revision data as returned by the query endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    /// Canonical revision hash reported by the service. This can differ from
    /// the one in the address (e.g. when the address asked for `latest`).
    pub id: String,
    /// Raw JSON text of the `Data` object, byte-for-byte as received.
    pub data: Vec<u8>,
}

#[derive(Deserialize)]
struct Envelope<'a> {
    // The service has answered with both spellings over time.
    #[serde(rename = "Data", alias = "data", borrow)]
    data: &'a RawValue,
}

#[derive(Deserialize)]
struct LayoutData {
    layout: LayoutNode,
}

#[derive(Deserialize)]
struct LayoutNode {
    revision: RevisionNode,
}

#[derive(Deserialize)]
struct RevisionNode {
    #[serde(rename = "hashId")]
    hash_id: String,
}

/// Two-stage partial decode of a `getLayout` response body.
pub(crate) fn parse_revision(body: &[u8]) -> Result<Revision> {
    let envelope: Envelope<'_> = serde_json::from_slice(body)
        .or_raise(|| ErrorKind::MalformedResponse("expected a JSON object with a `Data` field"))?;
    let raw = envelope.data.get();
    let layout: LayoutData = serde_json::from_str(raw)
        .or_raise(|| ErrorKind::MalformedResponse("missing string field `layout.revision.hashId`"))?;
    Ok(Revision {
        id: layout.layout.revision.hash_id,
        data: raw.as_bytes().to_vec(),
    })
}
