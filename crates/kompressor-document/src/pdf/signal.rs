// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-stream operator classification.

use std::collections::HashSet;

use kompressor_core::PageSignal;
use lopdf::Object;
use lopdf::content::Operation;

/// Show-text operators; each one is a text item.
const TEXT_OPERATORS: &[&str] = &["Tj", "TJ", "'", "\""];

/// Path-painting operators; each one paints a vector shape.
const VECTOR_OPERATORS: &[&str] = &["S", "s", "f", "F", "f*", "B", "B*", "b", "b*"];

/// Count the primitives in a decoded content stream.
///
/// `image_xobjects` holds the resource names of `/Subtype /Image` XObjects;
/// a `Do` on any other name (forms) is not an image paint. Inline images
/// (`BI`) always count.
pub fn classify_operations(operations: &[Operation], image_xobjects: &HashSet<Vec<u8>>) -> PageSignal {
    let mut signal = PageSignal::default();

    for op in operations {
        let operator = op.operator.as_str();
        if TEXT_OPERATORS.contains(&operator) {
            signal.text_item_count += 1;
        } else if VECTOR_OPERATORS.contains(&operator) {
            signal.vector_ops += 1;
        } else if operator == "BI" {
            signal.image_paint_ops += 1;
        } else if operator == "Do" {
            let paints_image = match op.operands.first() {
                Some(Object::Name(name)) => image_xobjects.contains(name),
                _ => false,
            };
            if paints_image {
                signal.image_paint_ops += 1;
            }
        }
    }

    signal
}
