//! The shop as seen by one user: current kitchen, identity and admin rights.
//!
//! A `Session` is opened once from the store and passed to whatever needs
//! the current kitchen or user. Profile and roster changes go through
//! [`ShopRepository::save`], so the stored shop is validated and repaired
//! on each write. Switching kitchens only repairs the kitchen selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::collab::{IdentityProvider, ImagePicker};
use crate::error::{KitchenError, StoreError, ValidationError};
use crate::id::generate_id;
use crate::models::{Admin, Kitchen, ShopInfo, UserInfo, ANONYMOUS_CUSTOMER, UNKNOWN_OPENID};
use crate::repo::ShopRepository;
use crate::store::Store;

/// How a user is recognised in a kitchen's admin roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminMatch {
    /// Nickname or openid. Two users sharing a nickname are both admins.
    #[default]
    NicknameOrOpenid,
    /// Openid only.
    OpenidOnly,
}

impl AdminMatch {
    pub fn matches(self, admin: &Admin, user: &UserInfo) -> bool {
        let by_openid = user
            .openid
            .as_deref()
            .is_some_and(|openid| !openid.is_empty() && openid == admin.openid);
        match self {
            AdminMatch::OpenidOnly => by_openid,
            AdminMatch::NicknameOrOpenid => {
                by_openid || (!user.nick_name.is_empty() && user.nick_name == admin.nick_name)
            }
        }
    }
}

impl fmt::Display for AdminMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminMatch::NicknameOrOpenid => write!(f, "nickname_or_openid"),
            AdminMatch::OpenidOnly => write!(f, "openid_only"),
        }
    }
}

impl FromStr for AdminMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nickname_or_openid" => Ok(AdminMatch::NicknameOrOpenid),
            "openid_only" => Ok(AdminMatch::OpenidOnly),
            _ => Err(format!(
                "Invalid admin match '{}'. Valid options: nickname_or_openid, openid_only",
                s
            )),
        }
    }
}

/// Which shop image to replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopImage {
    Avatar,
    Background,
}

/// Profile fields to overwrite on the shop.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub intro: Option<String>,
    pub avatar: Option<String>,
    pub background: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.intro.is_none()
            && self.avatar.is_none()
            && self.background.is_none()
    }
}

pub struct Session {
    shops: ShopRepository,
    shop: ShopInfo,
    user: Option<UserInfo>,
    admin_match: AdminMatch,
}

impl Session {
    /// Seeds the store if needed and loads the shop and last known user.
    pub fn open(store: Store, admin_match: AdminMatch) -> Result<Self, StoreError> {
        store.initialize()?;
        let shops = ShopRepository::new(store);
        let shop = shops.get()?;
        let user = shops.user()?;
        Ok(Self {
            shops,
            shop,
            user,
            admin_match,
        })
    }

    pub fn shop(&self) -> &ShopInfo {
        &self.shop
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn admin_match(&self) -> AdminMatch {
        self.admin_match
    }

    /// The selected kitchen, or the first one if the selection is stale.
    pub fn current_kitchen(&self) -> Option<&Kitchen> {
        self.shop.current_kitchen()
    }

    pub fn current_kitchen_id(&self) -> Option<String> {
        self.current_kitchen().map(|k| k.id.clone())
    }

    /// Name put on new orders.
    pub fn customer_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.nick_name.clone())
            .unwrap_or_else(|| ANONYMOUS_CUSTOMER.to_string())
    }

    fn commit(&mut self, shop: ShopInfo) -> Result<(), KitchenError> {
        self.shop = self.shops.save(shop)?;
        Ok(())
    }

    /// Selects a kitchen. Unknown ids leave the selection unchanged and
    /// return false.
    pub fn switch_kitchen(&mut self, kitchen_id: &str) -> Result<bool, KitchenError> {
        if self.shop.kitchen(kitchen_id).is_none() {
            return Ok(false);
        }
        let mut shop = self.shop.clone();
        shop.current_kitchen_id = kitchen_id.to_string();
        self.shop = self.shops.save_selection(shop)?;
        tracing::info!("Switched to kitchen '{}'", kitchen_id);
        Ok(true)
    }

    /// True if the current user is in the current kitchen's admin roster.
    pub fn is_admin(&self) -> bool {
        let (Some(kitchen), Some(user)) = (self.current_kitchen(), self.user.as_ref()) else {
            return false;
        };
        kitchen
            .admins
            .iter()
            .any(|admin| self.admin_match.matches(admin, user))
    }

    /// Asks the provider for the user's identity and remembers it.
    ///
    /// If the provider declines, the last stored identity is used instead.
    pub fn sign_in(
        &mut self,
        provider: &dyn IdentityProvider,
    ) -> Result<Option<&UserInfo>, StoreError> {
        match provider.identity() {
            Some(user) => {
                self.shops.save_user(&user)?;
                tracing::info!("Signed in as '{}'", user.nick_name);
                self.user = Some(user);
            }
            None => {
                tracing::debug!("Identity declined, using stored user");
                self.user = self.shops.user()?;
            }
        }
        Ok(self.user.as_ref())
    }

    pub fn add_kitchen(&mut self, name: &str) -> Result<Kitchen, KitchenError> {
        let name = crate::validate::kitchen_name(name)?;
        let kitchen = Kitchen::new(generate_id(), name);
        let mut shop = self.shop.clone();
        shop.kitchens.push(kitchen.clone());
        self.commit(shop)?;
        Ok(kitchen)
    }

    /// Removes a kitchen. The last kitchen cannot be removed.
    ///
    /// When no remaining kitchen is the default, the first one becomes
    /// the default. When the current kitchen goes, the default becomes
    /// current.
    pub fn delete_kitchen(&mut self, kitchen_id: &str) -> Result<Kitchen, KitchenError> {
        let mut shop = self.shop.clone();
        let position = shop
            .kitchens
            .iter()
            .position(|k| k.id == kitchen_id)
            .ok_or_else(|| ValidationError::UnknownKitchen(kitchen_id.to_string()))?;
        if shop.kitchens.len() == 1 {
            return Err(ValidationError::LastKitchen.into());
        }

        let removed = shop.kitchens.remove(position);
        if shop.default_kitchen().is_none() {
            shop.kitchens[0].is_default = true;
        }
        if shop.current_kitchen_id == removed.id {
            let fallback = shop.default_kitchen().map(|k| k.id.clone());
            if let Some(id) = fallback {
                shop.current_kitchen_id = id;
            }
        }

        self.commit(shop)?;
        tracing::info!("Deleted kitchen '{}'", removed.name);
        Ok(removed)
    }

    /// Adds the signed-in user to a kitchen's admins.
    pub fn add_admin(&mut self, kitchen_id: &str) -> Result<Admin, KitchenError> {
        let user = self.user.clone().ok_or(ValidationError::NoIdentity)?;
        let mut shop = self.shop.clone();
        let kitchen = shop
            .kitchen_mut(kitchen_id)
            .ok_or_else(|| ValidationError::UnknownKitchen(kitchen_id.to_string()))?;

        if kitchen
            .admins
            .iter()
            .any(|admin| self.admin_match.matches(admin, &user))
        {
            return Err(ValidationError::DuplicateAdmin(user.nick_name).into());
        }

        let admin = Admin {
            nick_name: user.nick_name,
            openid: user.openid.unwrap_or_else(|| UNKNOWN_OPENID.to_string()),
            avatar: user.avatar_url,
        };
        kitchen.admins.push(admin.clone());
        self.commit(shop)?;
        Ok(admin)
    }

    /// Removes the admin at `index`. Returns `None` if there is none there.
    pub fn remove_admin(
        &mut self,
        kitchen_id: &str,
        index: usize,
    ) -> Result<Option<Admin>, KitchenError> {
        let mut shop = self.shop.clone();
        let kitchen = shop
            .kitchen_mut(kitchen_id)
            .ok_or_else(|| ValidationError::UnknownKitchen(kitchen_id.to_string()))?;
        if index >= kitchen.admins.len() {
            return Ok(None);
        }
        let removed = kitchen.admins.remove(index);
        self.commit(shop)?;
        Ok(Some(removed))
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<&ShopInfo, KitchenError> {
        let mut shop = self.shop.clone();
        if let Some(name) = patch.name {
            shop.name = name;
        }
        if let Some(intro) = patch.intro {
            shop.intro = intro;
        }
        if let Some(avatar) = patch.avatar {
            shop.avatar = avatar;
        }
        if let Some(background) = patch.background {
            shop.background = background;
        }
        self.commit(shop)?;
        Ok(&self.shop)
    }

    /// Replaces a shop image with one chosen by `picker`. Returns false if
    /// nothing was picked.
    pub fn choose_image(
        &mut self,
        target: ShopImage,
        picker: &dyn ImagePicker,
    ) -> Result<bool, KitchenError> {
        let Some(path) = picker.pick_image() else {
            return Ok(false);
        };
        let patch = match target {
            ShopImage::Avatar => ProfilePatch {
                avatar: Some(path),
                ..Default::default()
            },
            ShopImage::Background => ProfilePatch {
                background: Some(path),
                ..Default::default()
            },
        };
        self.update_profile(patch)?;
        Ok(true)
    }

    pub fn notifications_enabled(&self) -> Result<bool, StoreError> {
        self.shops.notifications_enabled()
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.shops.set_notifications_enabled(enabled)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("shop", &self.shop.id)
            .field("current_kitchen", &self.shop.current_kitchen_id)
            .field("user", &self.user)
            .field("admin_match", &self.admin_match)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreKey;

    struct Provider(Option<UserInfo>);

    impl IdentityProvider for Provider {
        fn identity(&self) -> Option<UserInfo> {
            self.0.clone()
        }
    }

    struct Picker(Option<&'static str>);

    impl ImagePicker for Picker {
        fn pick_image(&self) -> Option<String> {
            self.0.map(String::from)
        }
    }

    fn session() -> Session {
        Session::open(Store::memory(), AdminMatch::default()).unwrap()
    }

    fn signed_in(user: UserInfo) -> Session {
        let mut session = session();
        session.sign_in(&Provider(Some(user))).unwrap();
        session
    }

    fn admin(nick_name: &str, openid: &str) -> Admin {
        Admin {
            nick_name: nick_name.into(),
            openid: openid.into(),
            avatar: None,
        }
    }

    fn with_admins(session: &mut Session, admins: Vec<Admin>) {
        let mut shop = session.shop().clone();
        shop.kitchens[0].admins = admins;
        session.commit(shop).unwrap();
    }

    #[test]
    fn test_open_seeds_default_shop() {
        let session = session();
        let kitchen = session.current_kitchen().unwrap();
        assert_eq!(kitchen.name, "主厨房");
        assert!(kitchen.is_default);
        assert_eq!(session.customer_name(), ANONYMOUS_CUSTOMER);
        assert!(!session.is_admin());
    }

    #[test]
    fn test_switch_kitchen() {
        let mut session = session();
        let second = session.add_kitchen("二厨房").unwrap();

        assert!(session.switch_kitchen(&second.id).unwrap());
        assert_eq!(session.current_kitchen_id(), Some(second.id.clone()));

        assert!(!session.switch_kitchen("nope").unwrap());
        assert_eq!(session.current_kitchen_id(), Some(second.id));
    }

    #[test]
    fn test_switch_persists() {
        let store = Store::memory();
        let mut session = Session::open(store.clone(), AdminMatch::default()).unwrap();
        let second = session.add_kitchen("二厨房").unwrap();
        session.switch_kitchen(&second.id).unwrap();

        let reopened = Session::open(store, AdminMatch::default()).unwrap();
        assert_eq!(reopened.current_kitchen_id(), Some(second.id));
    }

    #[test]
    fn test_switch_ignores_profile_text_limits() {
        let store = Store::memory();
        let mut shop = ShopInfo::default();
        shop.name = "店".repeat(40);
        shop.kitchens.push(Kitchen::new("kitchen_002", "二厨房"));
        store.set(StoreKey::ShopInfo, &shop).unwrap();

        let mut session = Session::open(store.clone(), AdminMatch::default()).unwrap();
        assert!(session.switch_kitchen("kitchen_002").unwrap());

        let stored: ShopInfo = store.get(StoreKey::ShopInfo).unwrap();
        assert_eq!(stored.current_kitchen_id, "kitchen_002");
        assert_eq!(stored.name, shop.name);
    }

    #[test]
    fn test_admin_by_openid_ignores_nickname() {
        let mut session = signed_in(UserInfo::new("New Name").with_openid("o-1"));
        with_admins(&mut session, vec![admin("Old Name", "o-1")]);
        assert!(session.is_admin());
    }

    #[test]
    fn test_admin_by_nickname_depends_on_policy() {
        let store = Store::memory();
        let mut session = Session::open(store.clone(), AdminMatch::NicknameOrOpenid).unwrap();
        session
            .sign_in(&Provider(Some(UserInfo::new("Ann").with_openid("o-2"))))
            .unwrap();
        with_admins(&mut session, vec![admin("Ann", "o-1")]);
        assert!(session.is_admin());

        let strict = Session::open(store, AdminMatch::OpenidOnly).unwrap();
        assert!(!strict.is_admin());
    }

    #[test]
    fn test_not_admin_without_kitchen() {
        let store = Store::memory();
        let mut shop = ShopInfo::default();
        shop.kitchens.clear();
        store.set(StoreKey::ShopInfo, &shop).unwrap();
        store
            .set(StoreKey::UserInfo, &UserInfo::new("Ann").with_openid("o-1"))
            .unwrap();

        let session = Session::open(store, AdminMatch::default()).unwrap();
        assert!(session.current_kitchen().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_stale_current_kitchen_falls_back_to_first() {
        let store = Store::memory();
        let mut shop = ShopInfo::default();
        shop.current_kitchen_id = "gone".into();
        store.set(StoreKey::ShopInfo, &shop).unwrap();

        let session = Session::open(store, AdminMatch::default()).unwrap();
        assert_eq!(session.current_kitchen().unwrap().id, "kitchen_001");
    }

    #[test]
    fn test_sign_in_declined_uses_stored_user() {
        let store = Store::memory();
        store.set(StoreKey::UserInfo, &UserInfo::new("Ann")).unwrap();
        let mut session = Session::open(store, AdminMatch::default()).unwrap();

        let user = session.sign_in(&Provider(None)).unwrap();
        assert_eq!(user.unwrap().nick_name, "Ann");
        assert_eq!(session.customer_name(), "Ann");
    }

    #[test]
    fn test_sign_in_declined_without_stored_user() {
        let mut session = session();
        assert!(session.sign_in(&Provider(None)).unwrap().is_none());
    }

    #[test]
    fn test_delete_last_kitchen_is_refused() {
        let mut session = session();
        let err = session.delete_kitchen("kitchen_001").unwrap_err();
        assert!(matches!(
            err,
            KitchenError::Validation(ValidationError::LastKitchen)
        ));
        assert_eq!(session.shop().kitchens.len(), 1);
    }

    #[test]
    fn test_delete_unknown_kitchen() {
        let mut session = session();
        assert!(matches!(
            session.delete_kitchen("nope").unwrap_err(),
            KitchenError::Validation(ValidationError::UnknownKitchen(_))
        ));
    }

    #[test]
    fn test_delete_current_kitchen_moves_to_default() {
        let mut session = session();
        let second = session.add_kitchen("二厨房").unwrap();
        session.switch_kitchen(&second.id).unwrap();

        session.delete_kitchen(&second.id).unwrap();
        assert_eq!(session.current_kitchen_id().as_deref(), Some("kitchen_001"));
    }

    #[test]
    fn test_delete_default_kitchen_promotes_another() {
        let mut session = session();
        let second = session.add_kitchen("二厨房").unwrap();

        session.delete_kitchen("kitchen_001").unwrap();
        let shop = session.shop();
        assert_eq!(shop.kitchens.len(), 1);
        assert!(shop.kitchens[0].is_default);
        assert_eq!(shop.current_kitchen_id, second.id);
    }

    #[test]
    fn test_delete_default_keeps_existing_default() {
        let store = Store::memory();
        let mut shop = ShopInfo::default();
        shop.kitchens.push(Kitchen::new("kitchen_002", "二厨房"));
        let mut third = Kitchen::new("kitchen_003", "三厨房");
        third.is_default = true;
        shop.kitchens.push(third);
        store.set(StoreKey::ShopInfo, &shop).unwrap();

        let mut session = Session::open(store, AdminMatch::default()).unwrap();
        session.delete_kitchen("kitchen_001").unwrap();

        let defaults: Vec<&str> = session
            .shop()
            .kitchens
            .iter()
            .filter(|k| k.is_default)
            .map(|k| k.id.as_str())
            .collect();
        assert_eq!(defaults, vec!["kitchen_003"]);
        assert_eq!(session.current_kitchen_id().as_deref(), Some("kitchen_003"));
    }

    #[test]
    fn test_add_admin() {
        let mut session = session();
        assert!(matches!(
            session.add_admin("kitchen_001").unwrap_err(),
            KitchenError::Validation(ValidationError::NoIdentity)
        ));

        session.sign_in(&Provider(Some(UserInfo::new("Ann")))).unwrap();
        let added = session.add_admin("kitchen_001").unwrap();
        assert_eq!(added.openid, UNKNOWN_OPENID);
        assert!(session.is_admin());

        assert!(matches!(
            session.add_admin("kitchen_001").unwrap_err(),
            KitchenError::Validation(ValidationError::DuplicateAdmin(_))
        ));
    }

    #[test]
    fn test_remove_admin() {
        let mut session = session();
        with_admins(&mut session, vec![admin("A", "a"), admin("B", "b")]);

        let removed = session.remove_admin("kitchen_001", 0).unwrap().unwrap();
        assert_eq!(removed.nick_name, "A");
        assert!(session.remove_admin("kitchen_001", 5).unwrap().is_none());
        assert_eq!(session.shop().kitchens[0].admins.len(), 1);
    }

    #[test]
    fn test_update_profile_validates() {
        let mut session = session();
        let shop = session
            .update_profile(ProfilePatch {
                name: Some("  小馆 ".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(shop.name, "小馆");

        let err = session
            .update_profile(ProfilePatch {
                name: Some("".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            KitchenError::Validation(ValidationError::EmptyName { .. })
        ));
        assert_eq!(session.shop().name, "小馆");
    }

    #[test]
    fn test_choose_image() {
        let mut session = session();
        assert!(!session
            .choose_image(ShopImage::Avatar, &Picker(None))
            .unwrap());
        assert_eq!(session.shop().avatar, "");

        assert!(session
            .choose_image(ShopImage::Background, &Picker(Some("/tmp/bg.png")))
            .unwrap());
        assert_eq!(session.shop().background, "/tmp/bg.png");
    }

    #[test]
    fn test_admin_match_parse() {
        assert_eq!(
            "openid_only".parse::<AdminMatch>().unwrap(),
            AdminMatch::OpenidOnly
        );
        assert!("anyone".parse::<AdminMatch>().is_err());
        assert_eq!(AdminMatch::default().to_string(), "nickname_or_openid");
    }
}
