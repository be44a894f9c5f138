use std::fmt;

use puppet_shared::constants::SERVICE_NAME;

/// Every method of the remote `wechaty.Puppet` service this client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteMethod {
    Start,
    Stop,
    Logout,
    Ding,
    DirtyPayload,
    Event,
    ContactList,
    ContactPayload,
    ContactAlias,
    ContactAvatar,
    ContactSelfQrCode,
    ContactSelfName,
    ContactSelfSignature,
    TagContactAdd,
    TagContactRemove,
    TagContactDelete,
    TagContactList,
    MessageSendText,
    MessageSendContact,
    MessageSendFile,
    MessageSendUrl,
    MessageSendMiniProgram,
    MessageRecall,
    MessagePayload,
    MessageContact,
    MessageUrl,
    MessageMiniProgram,
    MessageFileStream,
    MessageImageStream,
    RoomList,
    RoomCreate,
    RoomPayload,
    RoomMemberList,
    RoomMemberPayload,
    RoomAdd,
    RoomDel,
    RoomQuit,
    RoomTopic,
    RoomAnnounce,
    RoomQrCode,
    RoomAvatar,
    RoomInvitationPayload,
    RoomInvitationAccept,
    FriendshipSearchPhone,
    FriendshipSearchWeixin,
    FriendshipAdd,
    FriendshipPayload,
    FriendshipAccept,
}

impl RemoteMethod {
    /// Method name as declared by the service.
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Logout => "Logout",
            Self::Ding => "Ding",
            Self::DirtyPayload => "DirtyPayload",
            Self::Event => "Event",
            Self::ContactList => "ContactList",
            Self::ContactPayload => "ContactPayload",
            Self::ContactAlias => "ContactAlias",
            Self::ContactAvatar => "ContactAvatar",
            Self::ContactSelfQrCode => "ContactSelfQRCode",
            Self::ContactSelfName => "ContactSelfName",
            Self::ContactSelfSignature => "ContactSelfSignature",
            Self::TagContactAdd => "TagContactAdd",
            Self::TagContactRemove => "TagContactRemove",
            Self::TagContactDelete => "TagContactDelete",
            Self::TagContactList => "TagContactList",
            Self::MessageSendText => "MessageSendText",
            Self::MessageSendContact => "MessageSendContact",
            Self::MessageSendFile => "MessageSendFile",
            Self::MessageSendUrl => "MessageSendUrl",
            Self::MessageSendMiniProgram => "MessageSendMiniProgram",
            Self::MessageRecall => "MessageRecall",
            Self::MessagePayload => "MessagePayload",
            Self::MessageContact => "MessageContact",
            Self::MessageUrl => "MessageUrl",
            Self::MessageMiniProgram => "MessageMiniProgram",
            Self::MessageFileStream => "MessageFileStream",
            Self::MessageImageStream => "MessageImageStream",
            Self::RoomList => "RoomList",
            Self::RoomCreate => "RoomCreate",
            Self::RoomPayload => "RoomPayload",
            Self::RoomMemberList => "RoomMemberList",
            Self::RoomMemberPayload => "RoomMemberPayload",
            Self::RoomAdd => "RoomAdd",
            Self::RoomDel => "RoomDel",
            Self::RoomQuit => "RoomQuit",
            Self::RoomTopic => "RoomTopic",
            Self::RoomAnnounce => "RoomAnnounce",
            Self::RoomQrCode => "RoomQRCode",
            Self::RoomAvatar => "RoomAvatar",
            Self::RoomInvitationPayload => "RoomInvitationPayload",
            Self::RoomInvitationAccept => "RoomInvitationAccept",
            Self::FriendshipSearchPhone => "FriendshipSearchPhone",
            Self::FriendshipSearchWeixin => "FriendshipSearchWeixin",
            Self::FriendshipAdd => "FriendshipAdd",
            Self::FriendshipPayload => "FriendshipPayload",
            Self::FriendshipAccept => "FriendshipAccept",
        }
    }

    /// Full gRPC path, `/wechaty.Puppet/<Name>`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Start => "/wechaty.Puppet/Start",
            Self::Stop => "/wechaty.Puppet/Stop",
            Self::Logout => "/wechaty.Puppet/Logout",
            Self::Ding => "/wechaty.Puppet/Ding",
            Self::DirtyPayload => "/wechaty.Puppet/DirtyPayload",
            Self::Event => "/wechaty.Puppet/Event",
            Self::ContactList => "/wechaty.Puppet/ContactList",
            Self::ContactPayload => "/wechaty.Puppet/ContactPayload",
            Self::ContactAlias => "/wechaty.Puppet/ContactAlias",
            Self::ContactAvatar => "/wechaty.Puppet/ContactAvatar",
            Self::ContactSelfQrCode => "/wechaty.Puppet/ContactSelfQRCode",
            Self::ContactSelfName => "/wechaty.Puppet/ContactSelfName",
            Self::ContactSelfSignature => "/wechaty.Puppet/ContactSelfSignature",
            Self::TagContactAdd => "/wechaty.Puppet/TagContactAdd",
            Self::TagContactRemove => "/wechaty.Puppet/TagContactRemove",
            Self::TagContactDelete => "/wechaty.Puppet/TagContactDelete",
            Self::TagContactList => "/wechaty.Puppet/TagContactList",
            Self::MessageSendText => "/wechaty.Puppet/MessageSendText",
            Self::MessageSendContact => "/wechaty.Puppet/MessageSendContact",
            Self::MessageSendFile => "/wechaty.Puppet/MessageSendFile",
            Self::MessageSendUrl => "/wechaty.Puppet/MessageSendUrl",
            Self::MessageSendMiniProgram => "/wechaty.Puppet/MessageSendMiniProgram",
            Self::MessageRecall => "/wechaty.Puppet/MessageRecall",
            Self::MessagePayload => "/wechaty.Puppet/MessagePayload",
            Self::MessageContact => "/wechaty.Puppet/MessageContact",
            Self::MessageUrl => "/wechaty.Puppet/MessageUrl",
            Self::MessageMiniProgram => "/wechaty.Puppet/MessageMiniProgram",
            Self::MessageFileStream => "/wechaty.Puppet/MessageFileStream",
            Self::MessageImageStream => "/wechaty.Puppet/MessageImageStream",
            Self::RoomList => "/wechaty.Puppet/RoomList",
            Self::RoomCreate => "/wechaty.Puppet/RoomCreate",
            Self::RoomPayload => "/wechaty.Puppet/RoomPayload",
            Self::RoomMemberList => "/wechaty.Puppet/RoomMemberList",
            Self::RoomMemberPayload => "/wechaty.Puppet/RoomMemberPayload",
            Self::RoomAdd => "/wechaty.Puppet/RoomAdd",
            Self::RoomDel => "/wechaty.Puppet/RoomDel",
            Self::RoomQuit => "/wechaty.Puppet/RoomQuit",
            Self::RoomTopic => "/wechaty.Puppet/RoomTopic",
            Self::RoomAnnounce => "/wechaty.Puppet/RoomAnnounce",
            Self::RoomQrCode => "/wechaty.Puppet/RoomQRCode",
            Self::RoomAvatar => "/wechaty.Puppet/RoomAvatar",
            Self::RoomInvitationPayload => "/wechaty.Puppet/RoomInvitationPayload",
            Self::RoomInvitationAccept => "/wechaty.Puppet/RoomInvitationAccept",
            Self::FriendshipSearchPhone => "/wechaty.Puppet/FriendshipSearchPhone",
            Self::FriendshipSearchWeixin => "/wechaty.Puppet/FriendshipSearchWeixin",
            Self::FriendshipAdd => "/wechaty.Puppet/FriendshipAdd",
            Self::FriendshipPayload => "/wechaty.Puppet/FriendshipPayload",
            Self::FriendshipAccept => "/wechaty.Puppet/FriendshipAccept",
        }
    }

    /// `true` for methods answered with a stream of frames.
    pub fn is_streaming(self) -> bool {
        matches!(
            self,
            Self::Event | Self::MessageFileStream | Self::MessageImageStream
        )
    }
}

impl fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", SERVICE_NAME, self.name())
    }
}
