use crate::database::DbPool;
use crate::entities::user_entity;
use crate::error::{AppError, AppResult};
use crate::models::{
    AccessTokenResponse, AuthResponse, LoginRequest, RegisterRequest, UpdatePasswordRequest,
    UpdateUserRequest, UserResponse,
};
use crate::utils::{hash_password, validate_password, verify_password, JwtService};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, Set,
};

#[derive(Clone)]
pub struct UserService {
    pool: DbPool,
    jwt: JwtService,
}

impl UserService {
    pub fn new(pool: DbPool, jwt: JwtService) -> Self {
        Self { pool, jwt }
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserResponse> {
        if req.username.is_empty() {
            return Err(AppError::InvalidArgument("用户名不能为空".to_string()));
        }
        validate_password(&req.password)?;

        let exists = user_entity::Entity::find()
            .filter(user_entity::Column::Username.eq(req.username.as_str()))
            .count(&self.pool)
            .await?;
        if exists > 0 {
            return Err(AppError::AlreadyExists("用户名已存在".to_string()));
        }

        let hashed = hash_password(&req.password)?;
        let user = user_entity::ActiveModel {
            username: Set(req.username),
            password: Set(hashed),
            mobile: Set(req.mobile),
            nickname: Set(req.nickname),
            role: Set("user".to_string()),
            is_disabled: Set(false),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(UserResponse::from(user))
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let user = user_entity::Entity::find()
            .filter(user_entity::Column::Username.eq(req.username.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        if user.is_disabled {
            return Err(AppError::PermissionDenied("账号已被禁用".to_string()));
        }

        if !verify_password(&req.password, &user.password)? {
            return Err(AppError::AuthError("密码错误".to_string()));
        }

        let access_token = self.jwt.generate_access_token(user.id, &user.username)?;
        let refresh_token = self.jwt.generate_refresh_token(user.id, &user.username)?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt.get_access_token_expires_in(),
            user: UserResponse::from(user),
        })
    }

    /// 用 refresh token 换新的 access token
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AccessTokenResponse> {
        let claims = self.jwt.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("非法的 token".to_string()))?;

        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        if user.is_disabled {
            return Err(AppError::PermissionDenied("账号已被禁用".to_string()));
        }

        let access_token = self.jwt.generate_access_token(user.id, &user.username)?;
        Ok(AccessTokenResponse {
            access_token,
            expires_in: self.jwt.get_access_token_expires_in(),
        })
    }

    pub async fn get_info(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;
        Ok(UserResponse::from(user))
    }

    pub async fn update_profile(&self, user_id: i64, req: UpdateUserRequest) -> AppResult<UserResponse> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        let mut am = user.into_active_model();
        if let Some(nickname) = req.nickname {
            am.nickname = Set(Some(nickname));
        }
        if let Some(avatar) = req.avatar {
            am.avatar = Set(Some(avatar));
        }
        if let Some(mobile) = req.mobile {
            am.mobile = Set(Some(mobile));
        }
        let updated = am.update(&self.pool).await?;

        Ok(UserResponse::from(updated))
    }

    pub async fn update_password(&self, user_id: i64, req: UpdatePasswordRequest) -> AppResult<()> {
        validate_password(&req.new_password)?;

        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        if !verify_password(&req.old_password, &user.password)? {
            return Err(AppError::AuthError("旧密码错误".to_string()));
        }

        let hashed = hash_password(&req.new_password)?;
        let mut am = user.into_active_model();
        am.password = Set(hashed);
        am.update(&self.pool).await?;

        Ok(())
    }
}
