/// 頂点 `b` における b→a と b→c のなす角（度）
///
/// x, y のみ使用。atan2 の差を折り返して常に [0, 180] に収める。
pub fn angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let radians = f32::atan2(c.1 - b.1, c.0 - b.0) - f32::atan2(a.1 - b.1, a.0 - b.0);
    let degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}

/// `hip` の真上の基準点（画像座標は下向きが正）
pub fn vertical_reference(hip: (f32, f32), offset: f32) -> (f32, f32) {
    (hip.0, hip.1 - offset)
}
