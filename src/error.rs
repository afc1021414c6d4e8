use thiserror::Error;

/// 解析できないフレーム。呼び出し側の状態は変更されない
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyzeError {
    /// 両腰を比較するのに必要な数に満たない
    #[error("Too few landmarks: expected at least {expected}, got {actual}")]
    TooFewLandmarks {
        expected: usize,
        actual: usize,
    },

    /// 選択側の関節がフレームに含まれていない
    #[error("Missing landmark {index} (frame has {len})")]
    MissingLandmark {
        index: usize,
        len: usize,
    },

    /// フレーム内の座標、または腰の可視性が NaN/無限大
    #[error("Non-finite value in landmark {index}")]
    NonFinite {
        index: usize,
    },
}
