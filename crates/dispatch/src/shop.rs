//! The repair centre shown on the walk-in screen.

/// Fixed details of the walk-in repair centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopInfo {
    pub title: &'static str,
    pub address_zh: &'static str,
    pub address_en: &'static str,
    pub hours: &'static str,
}

pub const SHOP: ShopInfo = ShopInfo {
    title: "親臨維修中心",
    address_zh: "香港觀塘偉業街169號",
    address_en: "169 Wai Yip St, Kwun Tong, Hong Kong",
    hours: "營業時間: 24小時 (24 Hours)",
};

impl ShopInfo {
    /// Google Maps driving directions to the shop.
    pub fn navigation_link(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={}",
            self.address_en.replace(' ', "+")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_link() {
        assert_eq!(
            SHOP.navigation_link(),
            "https://www.google.com/maps/dir/?api=1&destination=169+Wai+Yip+St,+Kwun+Tong,+Hong+Kong"
        );
    }
}
