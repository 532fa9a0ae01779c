//! Сообщение ответа: упорядоченная последовательность сегментов и чистые
//! выборки по идентификатору.

use crate::segment::{Segment, SegmentPayload};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub segments: Vec<Segment>,
}

impl Message {
    pub fn new(segments: Vec<Segment>) -> Self {
        Message { segments }
    }

    /// Первое вхождение сегмента с типизированным телом.
    pub fn find_segment(&self, seg_id: &str) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.header.seg_id == seg_id && !matches!(s.payload, SegmentPayload::Unknown(_)))
    }

    /// Все типизированные вхождения, в порядке следования.
    pub fn find_all_segments(&self, seg_id: &str) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|s| s.header.seg_id == seg_id && !matches!(s.payload, SegmentPayload::Unknown(_)))
            .collect()
    }

    /// Сегменты, известные только по заголовку — например, динамически
    /// именованные параметрические сегменты.
    pub fn find_all_unknown_segments(&self, seg_id: &str) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|s| s.header.seg_id == seg_id && matches!(s.payload, SegmentPayload::Unknown(_)))
            .collect()
    }
}
